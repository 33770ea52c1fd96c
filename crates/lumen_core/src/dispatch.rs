//! Kernel dispatch sizing.
//!
//! The kernel runs one invocation per pixel in square workgroups. The
//! grid is rounded up so partial tiles at the right and bottom edges are
//! still dispatched; the kernel discards invocations outside the image.

/// Workgroup edge length in pixels. Must match the kernel's
/// `@workgroup_size`.
pub const KERNEL_TILE_SIZE: u32 = 8;

/// Number of workgroups to launch in X and Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchGrid {
    pub groups_x: u32,
    pub groups_y: u32,
    pub tile_size: u32,
}

impl DispatchGrid {
    /// Smallest grid of `tile_size` tiles covering a `width` × `height` image.
    pub fn covering(width: u32, height: u32, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            groups_x: width.div_ceil(tile_size),
            groups_y: height.div_ceil(tile_size),
            tile_size,
        }
    }

    /// Grid for the kernel's fixed 8×8 workgroups.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self::covering(width, height, KERNEL_TILE_SIZE)
    }

    /// Pixel extent covered by the grid (at least the image size).
    #[cfg(test)]
    pub(crate) fn covered_extent(&self) -> (u32, u32) {
        (self.groups_x * self.tile_size, self.groups_y * self.tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit() {
        let grid = DispatchGrid::for_viewport(128, 64);
        assert_eq!((grid.groups_x, grid.groups_y), (16, 8));
        assert_eq!(grid.covered_extent(), (128, 64));
    }

    #[test]
    fn test_partial_fit_rounds_up() {
        let grid = DispatchGrid::for_viewport(1281, 721);
        assert_eq!((grid.groups_x, grid.groups_y), (161, 91));

        let (w, h) = grid.covered_extent();
        assert!(w >= 1281 && w - 1281 < KERNEL_TILE_SIZE);
        assert!(h >= 721 && h - 721 < KERNEL_TILE_SIZE);
    }

    #[test]
    fn test_tiny_viewport() {
        let grid = DispatchGrid::for_viewport(1, 1);
        assert_eq!((grid.groups_x, grid.groups_y), (1, 1));
    }

    #[test]
    fn test_other_tile_sizes_cover() {
        for tile in [1, 4, 16, 32] {
            let grid = DispatchGrid::covering(100, 37, tile);
            let (w, h) = grid.covered_extent();
            assert!(w >= 100 && h >= 37);
        }
    }
}
