use crate::error::ConvertError;
use crate::image::pixel::PixelValue;

/// Fixed-size row-major RGB grid. The amplitude channel lands in red, the
/// frequency channel in blue; green stays zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB24 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Fill outcome reported by [`ImageAssembler::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStatus {
    Complete,
    Unfilled { filled: usize },
}

/// Writes pixels in raster order, tracking the fill count. The cursor only
/// moves forward; a cell is never revisited.
pub struct ImageAssembler {
    grid: ImageGrid,
    filled: usize,
}

impl ImageAssembler {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: ImageGrid::new(width, height),
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.grid.width as usize * self.grid.height as usize
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Writes all channels of the next cell in raster order.
    pub fn insert(&mut self, px: PixelValue) -> Result<(), ConvertError> {
        if self.filled >= self.capacity() {
            return Err(ConvertError::GridOverfilled {
                capacity: self.capacity(),
            });
        }

        let width = self.grid.width as usize;
        let x = self.filled % width;
        let y = self.filled / width;
        debug_assert!(x < width && y < self.grid.height as usize);

        let idx = (y * width + x) * 3;
        self.grid.data[idx] = px.amplitude;
        self.grid.data[idx + 1] = 0;
        self.grid.data[idx + 2] = px.frequency;

        self.filled += 1;
        Ok(())
    }

    /// Consumes the assembler. Unfilled cells keep their zero initialization;
    /// the status flags the deficit rather than erroring.
    pub fn finalize(self) -> (ImageGrid, GridStatus) {
        let status = if self.filled == self.capacity() {
            GridStatus::Complete
        } else {
            GridStatus::Unfilled {
                filled: self.filled,
            }
        };
        (self.grid, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(frequency: u8, amplitude: u8) -> PixelValue {
        PixelValue {
            frequency,
            amplitude,
        }
    }

    #[test]
    fn full_fill_is_complete() {
        let mut asm = ImageAssembler::new(3, 2);
        for i in 0..6 {
            asm.insert(px(i as u8, 100 + i as u8)).unwrap();
        }
        let (grid, status) = asm.finalize();
        assert_eq!(status, GridStatus::Complete);
        assert_eq!(grid.data().len(), 3 * 2 * 3);
    }

    #[test]
    fn pixels_land_in_raster_order() {
        let mut asm = ImageAssembler::new(2, 2);
        for i in 0..3 {
            asm.insert(px(10 * (i + 1), 7)).unwrap();
        }
        let (grid, _) = asm.finalize();
        // r = amplitude, g = 0, b = frequency
        assert_eq!(grid.pixel(0, 0), [7, 0, 10]);
        assert_eq!(grid.pixel(1, 0), [7, 0, 20]);
        assert_eq!(grid.pixel(0, 1), [7, 0, 30]);
    }

    #[test]
    fn underfill_is_flagged_and_leaves_zeros() {
        let mut asm = ImageAssembler::new(2, 2);
        asm.insert(px(255, 255)).unwrap();
        let (grid, status) = asm.finalize();
        assert_eq!(status, GridStatus::Unfilled { filled: 1 });
        assert_eq!(grid.pixel(1, 0), [0, 0, 0]);
        assert_eq!(grid.pixel(1, 1), [0, 0, 0]);
    }

    #[test]
    fn overfill_is_an_error() {
        let mut asm = ImageAssembler::new(2, 1);
        asm.insert(px(1, 1)).unwrap();
        asm.insert(px(2, 2)).unwrap();
        let err = asm.insert(px(3, 3)).unwrap_err();
        assert!(matches!(err, ConvertError::GridOverfilled { capacity: 2 }));
        // The failed insert must not have advanced the cursor
        assert_eq!(asm.filled(), 2);
    }

    #[test]
    fn green_channel_stays_zero() {
        let mut asm = ImageAssembler::new(2, 2);
        for _ in 0..4 {
            asm.insert(px(200, 200)).unwrap();
        }
        let (grid, _) = asm.finalize();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(grid.pixel(x, y)[1], 0);
            }
        }
    }
}
