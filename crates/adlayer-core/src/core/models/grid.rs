/// A discrete cell coordinate on the surface grid.
///
/// Columns grow to the right and rows grow downwards, matching the screen
/// orientation of the editor front end. Coordinates may be negative; the
/// surface origin is wherever the initial bounds were placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    /// The column index of the cell.
    pub col: i32,
    /// The row index of the cell.
    pub row: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Returns this coordinate shifted by the given column/row deltas.
    pub fn offset(self, dc: i32, dr: i32) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

/// A rectangular, whole-cell region of the grid.
///
/// The rectangle is defined by its top-left cell and its extent in cells.
/// A `GridRect` is never degenerate: construction fails for zero width or
/// height, so every rectangle in the system covers at least one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    origin: GridCoord,
    width: u32,
    height: u32,
}

impl GridRect {
    /// Creates a rectangle from its top-left cell and extent.
    ///
    /// # Return
    ///
    /// Returns `None` if `width` or `height` is zero.
    pub fn new(origin: GridCoord, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            origin,
            width,
            height,
        })
    }

    /// Creates the smallest rectangle covering both corner cells.
    ///
    /// The corners may be given in any order; the result always covers at
    /// least one cell, so this cannot fail.
    pub fn from_corners(a: GridCoord, b: GridCoord) -> Self {
        let left = a.col.min(b.col);
        let top = a.row.min(b.row);
        let width = a.col.abs_diff(b.col) + 1;
        let height = a.row.abs_diff(b.row) + 1;
        Self {
            origin: GridCoord::new(left, top),
            width,
            height,
        }
    }

    /// The top-left cell of the rectangle.
    pub fn origin(&self) -> GridCoord {
        self.origin
    }

    /// The extent of the rectangle in columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The extent of the rectangle in rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The column of the leftmost covered cell.
    pub fn left(&self) -> i32 {
        self.origin.col
    }

    /// The row of the topmost covered cell.
    pub fn top(&self) -> i32 {
        self.origin.row
    }

    /// The first column to the right of the rectangle (exclusive edge).
    pub fn right(&self) -> i32 {
        self.origin.col + self.width as i32
    }

    /// The first row below the rectangle (exclusive edge).
    pub fn bottom(&self) -> i32 {
        self.origin.row + self.height as i32
    }

    /// The number of cells covered by the rectangle.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks whether the given cell lies inside the rectangle.
    pub fn contains(&self, cell: GridCoord) -> bool {
        cell.col >= self.left()
            && cell.col < self.right()
            && cell.row >= self.top()
            && cell.row < self.bottom()
    }

    /// Checks whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &GridRect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Checks whether the two rectangles share at least one cell.
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns this rectangle shifted by the given column/row deltas.
    pub fn translated(&self, dc: i32, dr: i32) -> Self {
        Self {
            origin: self.origin.offset(dc, dr),
            width: self.width,
            height: self.height,
        }
    }

    /// Returns this rectangle moved so its top-left cell is `origin`.
    pub fn moved_to(&self, origin: GridCoord) -> Self {
        Self {
            origin,
            width: self.width,
            height: self.height,
        }
    }

    /// Iterates over all covered cells in row-major order (increasing column
    /// within increasing row). This is the canonical cell ordering used by
    /// the export pass.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> {
        let rect = *self;
        (rect.top()..rect.bottom())
            .flat_map(move |row| (rect.left()..rect.right()).map(move |col| GridCoord::new(col, row)))
    }
}
