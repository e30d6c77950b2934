//! Row store and column height index.
//!
//! Rows live in an arena and form a doubly linked stack from the floor up.
//! Slot 0 is a floor sentinel: it is never linked, reports every column as
//! occupied so downward scans always stop on it, and is what the column
//! height index points at for an empty column.
//!
//! Rows carry a creation stamp instead of a position. Rows are only ever
//! appended on top, so a larger stamp always means a higher row, and removing
//! a row in the middle of the stack never renumbers anything.

/// Number of columns in the grid.
pub const COLUMNS: usize = 10;

/// Occupancy mask with every column set.
pub const FULL_ROW: u16 = (1 << COLUMNS) - 1;

/// Handle to a row slot in the arena. Slots are addressed with the full
/// pointer width so a stack of any height fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowId(usize);

impl RowId {
    /// The implicit row below row 0.
    pub const FLOOR: RowId = RowId(0);

    #[inline(always)]
    fn index(self) -> usize {
        self.0
    }

    pub fn is_floor(self) -> bool {
        self == Self::FLOOR
    }
}

#[derive(Clone, Copy, Debug)]
struct RowNode {
    /// Bit `c` set when column `c` is occupied.
    cells: u16,
    stamp: u64,
    prev: RowId,
    next: Option<RowId>,
    linked: bool,
}

impl RowNode {
    const FLOOR: Self = Self {
        cells: FULL_ROW,
        stamp: 0,
        prev: RowId::FLOOR,
        next: None,
        linked: false,
    };
}

/// What a single cell looks like from above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    /// Occupied and covered by another occupied cell higher up.
    Occupied,
    /// The topmost occupied cell of its column.
    Visible,
}

/// The stacked rows plus, per column, the topmost row occupying it.
#[derive(Clone, Debug)]
pub struct Grid {
    nodes: Vec<RowNode>,
    free: Vec<RowId>,
    top: RowId,
    len: usize,
    surface: [RowId; COLUMNS],
    next_stamp: u64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Creates an empty grid: no rows, every column at the floor.
    pub fn new() -> Self {
        Self {
            nodes: vec![RowNode::FLOOR],
            free: Vec::new(),
            top: RowId::FLOOR,
            len: 0,
            surface: [RowId::FLOOR; COLUMNS],
            next_stamp: 1,
        }
    }

    /// Stack height: the number of live rows.
    pub fn height(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The highest row, or the floor when the grid is empty.
    pub fn top(&self) -> RowId {
        self.top
    }

    /// Topmost row occupying `column`, or [`RowId::FLOOR`].
    #[inline]
    pub fn surface(&self, column: usize) -> RowId {
        self.surface[column]
    }

    /// Creation stamp of a row. Higher rows have larger stamps; the floor is 0.
    #[inline]
    pub fn stamp(&self, row: RowId) -> u64 {
        self.nodes[row.index()].stamp
    }

    /// The row directly below `row`. The floor is its own lower neighbour.
    #[inline]
    pub fn below(&self, row: RowId) -> RowId {
        self.nodes[row.index()].prev
    }

    /// The row directly above `row`, if one exists.
    #[inline]
    pub fn above(&self, row: RowId) -> Option<RowId> {
        self.nodes[row.index()].next
    }

    /// The row directly above `row`, appending an empty row on top if `row`
    /// is currently the highest.
    pub fn above_or_push(&mut self, row: RowId) -> RowId {
        if let Some(next) = self.above(row) {
            return next;
        }
        debug_assert_eq!(row, self.top, "only the top row has no upper neighbour");
        self.push_row()
    }

    fn push_row(&mut self) -> RowId {
        let node = RowNode {
            cells: 0,
            stamp: self.next_stamp,
            prev: self.top,
            next: None,
            linked: true,
        };
        self.next_stamp += 1;

        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = RowId(self.nodes.len());
                self.nodes.push(node);
                id
            }
        };

        self.nodes[self.top.index()].next = Some(id);
        self.top = id;
        self.len += 1;
        id
    }

    /// Whether `row` is currently part of the stack.
    pub fn is_linked(&self, row: RowId) -> bool {
        self.nodes[row.index()].linked
    }

    /// Whether every column of a live row is occupied.
    pub fn is_full(&self, row: RowId) -> bool {
        let node = &self.nodes[row.index()];
        node.linked && node.cells == FULL_ROW
    }

    /// Marks the columns in `mask` occupied in `row` and raises the column
    /// height index for each of them.
    ///
    /// `row` must lie above the current surface of every column in `mask`.
    pub fn occupy(&mut self, row: RowId, mask: u16) {
        debug_assert!(self.is_linked(row), "occupying a row outside the stack");
        debug_assert_eq!(mask & !FULL_ROW, 0, "mask exceeds the grid width");

        let stamp = self.stamp(row);
        let node = &mut self.nodes[row.index()];
        debug_assert_eq!(node.cells & mask, 0, "cell occupied twice");
        node.cells |= mask;

        for column in columns_of(mask) {
            debug_assert!(stamp > self.stamp(self.surface[column]));
            self.surface[column] = row;
        }
    }

    /// Unlinks `row` from the stack and repairs the column height index.
    ///
    /// Returns `false` without touching anything if `row` is not live.
    pub fn remove(&mut self, row: RowId) -> bool {
        if !self.is_linked(row) {
            return false;
        }

        let RowNode { prev, next, .. } = self.nodes[row.index()];
        self.nodes[prev.index()].next = next;
        match next {
            Some(next) => self.nodes[next.index()].prev = prev,
            None => self.top = prev,
        }
        self.len -= 1;

        for column in 0..COLUMNS {
            if self.surface[column] != row {
                continue;
            }
            // the floor reports every column occupied, so this always stops
            let mut candidate = prev;
            while self.nodes[candidate.index()].cells & (1 << column) == 0 {
                candidate = self.nodes[candidate.index()].prev;
            }
            tracing::trace!(column, floor = candidate.is_floor(), "surface repaired");
            self.surface[column] = candidate;
        }

        let node = &mut self.nodes[row.index()];
        node.linked = false;
        node.cells = 0;
        node.next = None;
        self.free.push(row);
        true
    }

    /// Read-only view of a live row.
    pub fn row(&self, row: RowId) -> Option<RowView<'_>> {
        self.is_linked(row).then_some(RowView { grid: self, id: row })
    }

    /// Live rows from the top of the stack down to row 0.
    pub fn rows_top_down(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        let mut current = self.top;
        std::iter::from_fn(move || {
            if current.is_floor() {
                return None;
            }
            let view = RowView {
                grid: self,
                id: current,
            };
            current = self.below(current);
            Some(view)
        })
    }

    /// Full scan of the stack checking the row store against the column
    /// height index. Costs O(rows × columns); meant for tests.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen_above = 0u16;
        let mut expected = [None; COLUMNS];
        let mut count = 0;
        let mut last_stamp = u64::MAX;

        for view in self.rows_top_down() {
            count += 1;
            let cells = view.mask();
            if cells == 0 {
                return Err(format!("row {:?} is empty", view.id()));
            }
            if cells == FULL_ROW {
                return Err(format!("row {:?} is full but still stacked", view.id()));
            }
            let stamp = self.stamp(view.id());
            if stamp >= last_stamp {
                return Err(format!("row {:?} is out of stamp order", view.id()));
            }
            last_stamp = stamp;
            for column in columns_of(cells & !seen_above) {
                expected[column] = Some(view.id());
            }
            seen_above |= cells;
        }

        if count != self.len {
            return Err(format!("walked {count} rows but height is {}", self.len));
        }
        for (column, expected) in expected.into_iter().enumerate() {
            let expected = expected.unwrap_or(RowId::FLOOR);
            if self.surface[column] != expected {
                return Err(format!(
                    "column {column} surface is {:?}, expected {expected:?}",
                    self.surface[column]
                ));
            }
        }
        Ok(())
    }
}

/// Borrowed view of one live row.
#[derive(Clone, Copy)]
pub struct RowView<'a> {
    grid: &'a Grid,
    id: RowId,
}

impl<'a> RowView<'a> {
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Occupancy bits, bit `c` for column `c`.
    pub fn mask(&self) -> u16 {
        self.grid.nodes[self.id.index()].cells
    }

    pub fn is_occupied(&self, column: usize) -> bool {
        self.mask() & (1 << column) != 0
    }

    pub fn occupied_count(&self) -> usize {
        self.mask().count_ones() as usize
    }

    pub fn is_full(&self) -> bool {
        self.mask() == FULL_ROW
    }

    /// The row's columns left to right, marking visible surface cells.
    pub fn cells(&self) -> impl Iterator<Item = CellState> + 'a {
        let grid = self.grid;
        let id = self.id;
        let mask = self.mask();
        (0..COLUMNS).map(move |column| {
            if mask & (1 << column) == 0 {
                CellState::Empty
            } else if grid.surface(column) == id {
                CellState::Visible
            } else {
                CellState::Occupied
            }
        })
    }
}

/// Column indices set in `mask`, lowest first.
pub(crate) fn columns_of(mask: u16) -> impl Iterator<Item = usize> {
    (0..COLUMNS).filter(move |&column| mask & (1 << column) != 0)
}
