//! The [`Grid`] canvas: a 2D grid of [`Cell`]s with sub-view semantics.
//!
//! A `Grid` is a *view* into a shared backing buffer. Cloning yields another
//! view of the same storage. [`slice`](Grid::slice) narrows the view; all
//! coordinates passed to a view are relative to its own top-left corner, so
//! widgets can draw at `(0, 0)` without knowing where they were placed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::style::Style;

#[derive(Debug, Clone)]
struct Buffer {
    cells: Vec<Cell>,
    width: i32,
}

impl Buffer {
    #[inline]
    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }
}

/// A 2D canvas of [`Cell`]s backed by shared storage.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<Buffer>>,
    /// Absolute bounds of this view inside the buffer.
    bounds: Range,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with blank cells.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            buffer: Rc::new(RefCell::new(Buffer {
                cells: vec![Cell::default(); (w * h) as usize],
                width: w,
            })),
            bounds: Range::new(0, 0, w, h),
        }
    }

    /// Absolute bounds of this view.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the view.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// The view-relative range `(0, 0)..size`.
    #[inline]
    pub fn area(&self) -> Range {
        Range::with_size(Point::ZERO, self.size())
    }

    /// Sub-view covering the relative range `r`, clipped to this view.
    pub fn slice(&self, r: Range) -> Grid {
        let abs = Range {
            min: r.min + self.bounds.min,
            max: r.max + self.bounds.min,
        };
        Grid {
            buffer: Rc::clone(&self.buffer),
            bounds: self.bounds.intersect(abs),
        }
    }

    #[inline]
    fn absolute(&self, p: Point) -> Option<Point> {
        let q = p + self.bounds.min;
        self.bounds.contains(q).then_some(q)
    }

    /// Cell at relative position `p`, or a blank cell outside the view.
    pub fn at(&self, p: Point) -> Cell {
        match self.absolute(p) {
            Some(q) => {
                let buf = self.buffer.borrow();
                buf.cells[buf.index(q)]
            }
            None => Cell::default(),
        }
    }

    /// Set the cell at relative position `p`. No-op outside the view.
    pub fn set(&self, p: Point, cell: Cell) {
        if let Some(q) = self.absolute(p) {
            let mut buf = self.buffer.borrow_mut();
            let i = buf.index(q);
            buf.cells[i] = cell;
        }
    }

    /// Fill every cell of the view with `cell`.
    pub fn fill(&self, cell: Cell) {
        let mut buf = self.buffer.borrow_mut();
        for q in self.bounds.iter() {
            let i = buf.index(q);
            buf.cells[i] = cell;
        }
    }

    /// Write `text` starting at `p`, clipped to the view. Returns the number
    /// of cells written.
    pub fn print(&self, p: Point, text: &str, style: Style) -> i32 {
        let mut n = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(i as i32, 0);
            if q.x >= self.width() {
                break;
            }
            self.set(q, Cell::new(ch, style));
            n += 1;
        }
        n
    }

    /// Write `text` horizontally centered on relative row `y`.
    pub fn print_centered(&self, y: i32, text: &str, style: Style) -> i32 {
        let len = text.chars().count() as i32;
        let x = ((self.width() - len) / 2).max(0);
        self.print(Point::new(x, y), text, style)
    }

    /// Clear the view, draw a single-line frame with an optional title and
    /// return the inner view.
    pub fn draw_box(&self, title: &str, style: Style) -> Grid {
        let (w, h) = (self.width(), self.height());
        if w < 2 || h < 2 {
            return self.slice(Range::default());
        }
        self.fill(Cell::new(' ', style));
        for x in 1..w - 1 {
            self.set(Point::new(x, 0), Cell::new('─', style));
            self.set(Point::new(x, h - 1), Cell::new('─', style));
        }
        for y in 1..h - 1 {
            self.set(Point::new(0, y), Cell::new('│', style));
            self.set(Point::new(w - 1, y), Cell::new('│', style));
        }
        self.set(Point::new(0, 0), Cell::new('┌', style));
        self.set(Point::new(w - 1, 0), Cell::new('┐', style));
        self.set(Point::new(0, h - 1), Cell::new('└', style));
        self.set(Point::new(w - 1, h - 1), Cell::new('┘', style));
        if !title.is_empty() {
            let line = self.slice(Range::new(1, 0, w - 1, 1));
            line.print_centered(0, &format!(" {title} "), style);
        }
        self.slice(self.area().inset(1))
    }

    /// Copy every cell of `src` into `self` (same-sized full grids).
    pub fn copy_from(&self, src: &Grid) {
        if Rc::ptr_eq(&self.buffer, &src.buffer) {
            return;
        }
        let from = src.buffer.borrow();
        let mut to = self.buffer.borrow_mut();
        let n = from.cells.len().min(to.cells.len());
        to.cells[..n].copy_from_slice(&from.cells[..n]);
    }
}

// ---------------------------------------------------------------------------
// Frame / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// The set of cell changes a driver must flush.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Diff two same-sized grids. `full` forces every cell into the frame
/// (after a resize or on the first flush).
pub fn compute_frame(prev: &Grid, curr: &Grid, full: bool) -> Frame {
    let mut cells = Vec::new();
    for p in curr.area().iter() {
        let cc = curr.at(p);
        if full || prev.at(p) != cc {
            cells.push(FrameCell { cell: cc, pos: p });
        }
    }
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_with_bounds() {
        let g = Grid::new(4, 3);
        g.set(Point::new(2, 1), Cell::default().with_char('X'));
        assert_eq!(g.at(Point::new(2, 1)).ch, 'X');
        assert_eq!(g.at(Point::new(10, 10)), Cell::default());
    }

    #[test]
    fn slice_is_relative_and_shares_buffer() {
        let g = Grid::new(10, 5);
        let s = g.slice(Range::new(2, 1, 6, 4));
        s.set(Point::new(0, 0), Cell::default().with_char('#'));
        assert_eq!(g.at(Point::new(2, 1)).ch, '#');
        // Writes past the slice are clipped.
        s.set(Point::new(4, 0), Cell::default().with_char('!'));
        assert_eq!(g.at(Point::new(6, 1)).ch, ' ');
    }

    #[test]
    fn print_clips_at_edge() {
        let g = Grid::new(5, 1);
        let n = g.print(Point::new(2, 0), "hello", Style::default());
        assert_eq!(n, 3);
        assert_eq!(g.at(Point::new(4, 0)).ch, 'l');
    }

    #[test]
    fn draw_box_returns_inner_view() {
        let g = Grid::new(10, 5);
        let inner = g.draw_box("hi", Style::default());
        assert_eq!(inner.size(), Point::new(8, 3));
        assert_eq!(g.at(Point::new(0, 0)).ch, '┌');
        inner.set(Point::ZERO, Cell::default().with_char('@'));
        assert_eq!(g.at(Point::new(1, 1)).ch, '@');
    }

    #[test]
    fn compute_frame_diff() {
        let a = Grid::new(3, 2);
        let b = Grid::new(3, 2);
        b.set(Point::new(1, 0), Cell::default().with_char('A'));
        let frame = compute_frame(&a, &b, false);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(compute_frame(&a, &b, true).cells.len(), 6);
    }
}
