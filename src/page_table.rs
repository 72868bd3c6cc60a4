use crate::constants::DISK_LOCATION_WIDTH;

/// One virtual page of the job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTableEntry {
    page_number: usize,
    pub present: bool,
    /// Frame holding the page; `None` whenever the page is not present
    pub frame_number: Option<u32>,
    pub modified: bool,
    disk_location: String,
}

impl PageTableEntry {
    /// A non-resident page backed by its sequential disk location
    pub fn new(page_number: usize) -> Self {
        PageTableEntry {
            page_number,
            present: false,
            frame_number: None,
            modified: false,
            disk_location: format!("{:0width$}", page_number, width = DISK_LOCATION_WIDTH),
        }
    }

    #[inline]
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    #[inline]
    pub fn disk_location(&self) -> &str {
        &self.disk_location
    }

    /// Bring the page into `frame`. The modify bit reflects only this access.
    pub fn load(&mut self, frame: u32, is_write: bool) {
        self.present = true;
        self.frame_number = Some(frame);
        self.modified = is_write;
    }

    /// Drop the page out of memory, returning the frame it held
    pub fn evict(&mut self) -> Option<u32> {
        self.present = false;
        self.frame_number.take()
    }

    /// Frame number as shown in a table, blank when not present
    pub fn frame_cell(&self) -> String {
        match self.frame_number {
            Some(frame) if self.present => frame.to_string(),
            _ => String::new(),
        }
    }
}

/// Fixed-size page table indexed directly by page number
#[derive(Debug, Clone)]
pub struct PageTable {
    entries: Box<[PageTableEntry]>,
}

impl PageTable {
    /// Create a table of `num_pages` entries, all not present
    pub fn new(num_pages: usize) -> Self {
        let entries: Vec<PageTableEntry> = (0..num_pages).map(PageTableEntry::new).collect();
        PageTable {
            entries: entries.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, page: usize) -> Option<&PageTableEntry> {
        self.entries.get(page)
    }

    #[inline]
    pub fn get_mut(&mut self, page: usize) -> Option<&mut PageTableEntry> {
        self.entries.get_mut(page)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageTableEntry> {
        self.entries.iter()
    }

    /// Number of pages currently resident
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.present).count()
    }

    /// Owned copy of every entry, in page order
    pub fn snapshot(&self) -> Vec<PageTableEntry> {
        self.entries.to_vec()
    }
}
