// default geometry: 1 KiB pages, 64 KiB of memory, jobs up to 64 KiB
pub const OFFSET_BITS: u32 = 10;

pub const PAGE_SIZE: usize = 1 << OFFSET_BITS;
pub const BLOCK_SIZE: usize = PAGE_SIZE;

pub const MEMORY_SIZE: usize = 64 * 1024;
pub const NUM_BLOCKS: usize = MEMORY_SIZE / BLOCK_SIZE;

pub const MAX_JOB_SIZE: usize = 64 * 1024;
pub const NUM_PAGES: usize = MAX_JOB_SIZE / PAGE_SIZE;

/// Frames handed to a single job unless configured otherwise
pub const DEFAULT_FRAME_BUDGET: usize = 4;

/// Width of the zero-padded disk location assigned to each page
pub const DISK_LOCATION_WIDTH: usize = 3;
