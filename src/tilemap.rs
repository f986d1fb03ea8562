/// A bounded 2D grid stored as a flat row-major buffer.
///
/// Cells are addressed as `(x, z)` with `x` in `[0, width)` and `z` in
/// `[0, height)`. Unlike a planet map there is no wrapping: out-of-range
/// signed coordinates are either rejected (`get_signed`) or clamped
/// (`get_clamped`).
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[inline]
    fn index(&self, x: usize, z: usize) -> usize {
        assert!(x < self.width && z < self.height, "cell ({x}, {z}) out of bounds");
        z * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, z: usize) -> &mut T {
        let idx = self.index(x, z);
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    /// Whether a signed coordinate lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.height
    }

    /// Look up a signed coordinate, `None` when it falls outside the grid.
    pub fn get_signed(&self, x: i32, z: i32) -> Option<&T> {
        if self.in_bounds(x, z) {
            Some(self.get(x as usize, z as usize))
        } else {
            None
        }
    }

    /// Look up a signed coordinate clamped onto the nearest edge cell.
    pub fn get_clamped(&self, x: i32, z: i32) -> &T {
        let cx = x.clamp(0, self.width as i32 - 1) as usize;
        let cz = z.clamp(0, self.height as i32 - 1) as usize;
        self.get(cx, cz)
    }

    /// 4-connected neighbors that exist inside the grid (left, right, down, up).
    pub fn neighbors(&self, x: usize, z: usize) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.width as i32, self.height as i32);
        let (x, z) = (x as i32, z as i32);
        [(x - 1, z), (x + 1, z), (x, z - 1), (x, z + 1)]
            .into_iter()
            .filter(move |&(nx, nz)| nx >= 0 && nz >= 0 && nx < w && nz < h)
            .map(|(nx, nz)| (nx as usize, nz as usize))
    }

    /// Cells of the square window of half-size `radius` around
    /// `(x, z)`, restricted to the grid. Radii beyond the grid extent cover
    /// the whole grid.
    pub fn window(&self, x: usize, z: usize, radius: u32) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.width as i64, self.height as i64);
        let r = (radius as i64).min(w.max(h));
        let (cx, cz) = (x as i64, z as i64);
        let z_range = (cz - r).max(0)..=(cz + r).min(h - 1);
        z_range.flat_map(move |nz| {
            ((cx - r).max(0)..=(cx + r).min(w - 1)).map(move |nx| (nx as usize, nz as usize))
        })
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Row `z` as a slice.
    pub fn row(&self, z: usize) -> &[T] {
        let start = z * self.width;
        &self.data[start..start + self.width]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Tilemap<f64> {
    /// Minimum and maximum value over the whole grid.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut map = Tilemap::new_with(4, 3, 0u8);
        map.set(3, 1, 7);
        assert_eq!(map.as_slice()[1 * 4 + 3], 7);
        assert_eq!(map.row(1), &[0, 0, 0, 7]);
    }

    #[test]
    fn test_neighbors_do_not_wrap() {
        let map: Tilemap<u8> = Tilemap::new(5, 5);
        let corner: Vec<_> = map.neighbors(0, 0).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(map.neighbors(2, 2).count(), 4);
    }

    #[test]
    fn test_clamped_and_signed_lookup() {
        let mut map = Tilemap::new_with(3, 3, 0.0f64);
        map.set(0, 0, 1.5);
        map.set(2, 2, -2.0);
        assert_eq!(*map.get_clamped(-4, -1), 1.5);
        assert_eq!(*map.get_clamped(10, 10), -2.0);
        assert!(map.get_signed(3, 0).is_none());
        assert_eq!(map.get_signed(2, 2), Some(&-2.0));
        assert_eq!(map.min_max(), (-2.0, 1.5));
    }

    #[test]
    fn test_window_is_clipped() {
        let map: Tilemap<u8> = Tilemap::new(10, 10);
        assert_eq!(map.window(0, 0, 2).count(), 9);
        assert_eq!(map.window(5, 5, 2).count(), 25);
        assert_eq!(map.window(9, 5, 1).count(), 6);
    }

    #[test]
    fn test_huge_window_covers_grid() {
        let map: Tilemap<u8> = Tilemap::new(7, 4);
        assert_eq!(map.window(6, 3, u32::MAX).count(), 28);
        assert_eq!(map.window(0, 0, 1_000).count(), 28);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_range_column_panics() {
        let map: Tilemap<u8> = Tilemap::new(4, 4);
        // (5, 0) would alias (1, 1) without the check
        map.get(5, 0);
    }
}
