use ndarray::{Array2, ArrayView2, s};

use crate::error::{ForensicsError, Result};

/// A square window of side `size` anchored at its top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl Block {
    /// Read-only view of this block over a channel plane indexed `[row, column]`.
    pub fn view<'a>(&self, plane: &'a Array2<f64>) -> ArrayView2<'a, f64> {
        let (x, y, size) = (self.x as usize, self.y as usize, self.size as usize);
        plane.slice(s![y..y + size, x..x + size])
    }
}

/// Every overlapping block of an image at unit stride.
#[derive(Debug, Clone, Copy)]
pub struct BlockGrid {
    width: u32,
    height: u32,
    size: u32,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32, size: u32) -> Result<Self> {
        if size < 2 {
            return Err(ForensicsError::InvalidBlockSize(size));
        }

        if width < size || height < size {
            return Err(ForensicsError::ImageTooSmall(size));
        }

        Ok(Self { width, height, size })
    }

    pub fn columns(&self) -> u32 {
        self.width - self.size + 1
    }

    pub fn rows(&self) -> u32 {
        self.height - self.size + 1
    }

    pub fn len(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks in scan order: `x` is the outer loop, `y` the inner one.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.columns()).flat_map(move |x| {
            (0..self.rows()).map(move |y| Block { x, y, size: self.size })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count_and_bounds() {
        for (width, height, size) in [(10, 7, 2), (64, 64, 4), (9, 12, 9), (5, 5, 5)] {
            let grid = BlockGrid::new(width, height, size).unwrap();
            let blocks = grid.blocks().collect::<Vec<_>>();

            assert_eq!(blocks.len(), ((width - size + 1) * (height - size + 1)) as usize);
            assert_eq!(blocks.len(), grid.len());
            assert!(blocks.iter().all(|b| b.x <= width - size && b.y <= height - size));
        }
    }

    #[test]
    fn test_scan_order_is_column_major() {
        let grid = BlockGrid::new(4, 4, 2).unwrap();
        let coords = grid.blocks().map(|b| (b.x, b.y)).collect::<Vec<_>>();

        assert_eq!(&coords[..4], &[(0, 0), (0, 1), (0, 2), (1, 0)]);
        assert_eq!(coords.last(), Some(&(2, 2)));
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert!(matches!(BlockGrid::new(8, 8, 1), Err(ForensicsError::InvalidBlockSize(1))));
        assert!(matches!(BlockGrid::new(8, 8, 0), Err(ForensicsError::InvalidBlockSize(0))));
        assert!(matches!(BlockGrid::new(3, 8, 4), Err(ForensicsError::ImageTooSmall(4))));
    }

    #[test]
    fn test_view_covers_block() {
        let plane = Array2::from_shape_fn((6, 5), |(row, col)| (row * 10 + col) as f64);
        let block = Block { x: 2, y: 3, size: 2 };
        let view = block.view(&plane);

        assert_eq!(view.dim(), (2, 2));
        assert_eq!(view[[0, 0]], 32.0);
        assert_eq!(view[[1, 1]], 43.0);
    }
}
