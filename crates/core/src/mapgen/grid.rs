//! Fixed-size row-major grids shared by the carve, tile, and region passes.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self { width, height, cells: vec![fill; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Cell value, or `None` outside the grid.
    pub fn get(&self, pos: Pos) -> Option<T> {
        self.index_of(pos).map(|index| self.cells[index])
    }

    /// Writes `value` when `pos` is inside the grid; out-of-grid writes are dropped.
    pub fn set(&mut self, pos: Pos, value: T) {
        if let Some(index) = self.index_of(pos) {
            self.cells[index] = value;
        }
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<T> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }

    fn index_of(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }
}

impl<T: Copy> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &T {
        assert!(self.in_bounds(pos), "{pos:?} outside {}x{} grid", self.width, self.height);
        &self.cells[(pos.y as usize) * self.width + (pos.x as usize)]
    }
}

impl<T: Copy> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut T {
        assert!(self.in_bounds(pos), "{pos:?} outside {}x{} grid", self.width, self.height);
        &mut self.cells[(pos.y as usize) * self.width + (pos.x as usize)]
    }
}
