use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::config::PagingConfig;
use crate::error::{ConfigurationError, OutOfRangeError};
use crate::fifo::FifoQueue;
use crate::page_table::{PageTable, PageTableEntry};

/// A flat logical address split into page number and in-page offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub raw: usize,
    pub page: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// Decompose a raw logical address for pages of `1 << offset_bits` bytes
    pub fn from_raw(raw: usize, offset_bits: u32) -> Self {
        let page = raw >> offset_bits;
        let offset = raw & ((1usize << offset_bits) - 1);
        VirtualAddress { raw, page, offset }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LA({}) = (page={}, offset={})", self.raw, self.page, self.offset)
    }
}

/// A dirty page left memory and would have to be written back to disk.
/// Informational only; no storage is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBack {
    pub page_number: usize,
    pub frame_number: u32,
    pub disk_location: String,
}

/// Outcome of a single access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessResult {
    pub physical_address: usize,
    pub page_fault: bool,
    /// The accessed entry as it stands after the access
    pub entry: PageTableEntry,
    /// Page pushed out of memory to make room, if any
    pub evicted: Option<usize>,
    pub write_back: Option<WriteBack>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessStats {
    pub accesses: usize,
    pub faults: usize,
    pub evictions: usize,
    pub write_backs: usize,
}

impl AccessStats {
    pub fn hits(&self) -> usize {
        self.accesses - self.faults
    }

    /// Faults per access, 0.0 before any access
    pub fn fault_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.faults as f64 / self.accesses as f64
        }
    }
}

/// Demand-paging engine for one job with FIFO replacement over a fixed frame pool.
///
/// Every mutation goes through [`PagingEngine::translate_access`]; the page table,
/// the FIFO queue and the used-slot list are kept in lockstep by it.
#[derive(Debug, Clone)]
pub struct PagingEngine {
    config: PagingConfig,
    page_table: PageTable,
    frame_pool: Box<[u32]>,
    /// Resident pages, oldest first
    fifo_queue: FifoQueue<usize>,
    /// Occupied indices into `frame_pool`, in allocation order
    used_frame_slots: FifoQueue<usize>,
    stats: AccessStats,
}

impl PagingEngine {
    /// Build an engine whose pool is exactly `frames`, in the order given
    pub fn new(config: PagingConfig, frames: &[u32]) -> Result<Self, ConfigurationError> {
        config.validate()?;

        if frames.len() != config.frame_budget {
            return Err(ConfigurationError::FrameCountMismatch {
                budget: config.frame_budget,
                supplied: frames.len(),
            });
        }

        let blocks = config.num_blocks();
        let mut seen = HashSet::with_capacity(frames.len());
        for &frame in frames {
            if frame as usize >= blocks {
                return Err(ConfigurationError::FrameOutOfRange { frame, blocks });
            }
            if !seen.insert(frame) {
                return Err(ConfigurationError::DuplicateFrame(frame));
            }
        }

        debug!(
            "paging engine: {} pages of {} bytes, frame pool {:?}",
            config.num_pages(),
            config.page_size,
            frames
        );

        let page_table = PageTable::new(config.num_pages());
        debug_assert!(!page_table.is_empty());

        Ok(PagingEngine {
            config,
            page_table,
            frame_pool: frames.to_vec().into_boxed_slice(),
            fifo_queue: FifoQueue::with_capacity(config.frame_budget),
            used_frame_slots: FifoQueue::with_capacity(config.frame_budget),
            stats: AccessStats::default(),
        })
    }

    /// Default geometry with a budget of one frame per supplied identifier
    pub fn with_defaults(frames: &[u32]) -> Result<Self, ConfigurationError> {
        Self::new(PagingConfig::default().with_frame_budget(frames.len()), frames)
    }

    /// Access `offset` within `page_number`, faulting the page in if needed.
    ///
    /// Bounds are checked before anything is touched, so an `Err` leaves the
    /// engine exactly as it was.
    pub fn translate_access(
        &mut self,
        page_number: usize,
        offset: usize,
        is_write: bool,
    ) -> Result<AccessResult, OutOfRangeError> {
        self.check_bounds(page_number, offset)?;

        let page_fault = !self.page_table.get(page_number).is_some_and(|e| e.present);
        let mut evicted = None;
        let mut write_back = None;

        self.stats.accesses += 1;

        if page_fault {
            self.stats.faults += 1;

            let frame = if self.used_frame_slots.len() < self.config.frame_budget {
                let slot = self.used_frame_slots.len();
                self.used_frame_slots.push_back(slot);
                self.frame_pool[slot]
            } else {
                let (victim, slot, dirty) = self.evict_oldest();
                evicted = Some(victim);
                write_back = dirty;

                // same slot, new owner
                self.used_frame_slots.push_back(slot);
                self.frame_pool[slot]
            };

            debug_assert!(!self.fifo_queue.contains(&page_number));
            self.entry_mut(page_number).load(frame, is_write);
            self.fifo_queue.push_back(page_number);

            if self.used_frame_slots.len() > self.config.frame_budget {
                warn!(
                    "used frame slots ({}) exceeded budget {}, trimming",
                    self.used_frame_slots.len(),
                    self.config.frame_budget
                );
                self.used_frame_slots.truncate_front(self.config.frame_budget);
            }
            debug_assert!(self.page_table.present_count() <= self.config.frame_budget);

            debug!(
                "page fault: page {} -> frame {}{}",
                page_number,
                frame,
                evicted.map(|p| format!(", evicted page {}", p)).unwrap_or_default()
            );
        } else {
            if is_write {
                self.entry_mut(page_number).modified = true;
            }
            trace!("hit: page {}", page_number);
        }

        let entry = self.entry_mut(page_number).clone();
        let frame = entry
            .frame_number
            .expect("resident page always has a frame");
        let physical_address = ((frame as usize) << self.config.offset_bits()) + offset;

        Ok(AccessResult {
            physical_address,
            page_fault,
            entry,
            evicted,
            write_back,
        })
    }

    /// Translate a flat logical address of the job
    pub fn translate_address(
        &mut self,
        logical_address: usize,
        is_write: bool,
    ) -> Result<AccessResult, OutOfRangeError> {
        let va = VirtualAddress::from_raw(logical_address, self.config.offset_bits());
        self.translate_access(va.page, va.offset, is_write)
    }

    fn check_bounds(&self, page_number: usize, offset: usize) -> Result<(), OutOfRangeError> {
        let num_pages = self.page_table.len();
        if page_number >= num_pages {
            return Err(OutOfRangeError::PageOutOfRange {
                page: page_number,
                num_pages,
            });
        }
        if offset >= self.config.page_size {
            return Err(OutOfRangeError::OffsetOutOfRange {
                offset,
                page_size: self.config.page_size,
            });
        }
        Ok(())
    }

    /// Pop the longest-resident page and the pool slot it holds, marking the page
    /// not present. Only called with a full pool, so both queues are non-empty.
    fn evict_oldest(&mut self) -> (usize, usize, Option<WriteBack>) {
        let (Some(victim), Some(slot)) =
            (self.fifo_queue.pop_front(), self.used_frame_slots.pop_front())
        else {
            unreachable!("frame pool is full but nothing is resident");
        };
        self.stats.evictions += 1;

        let entry = self.entry_mut(victim);
        let dirty = entry.modified;
        let disk_location = entry.disk_location().to_string();
        let frame = entry.evict();
        debug_assert_eq!(frame, Some(self.frame_pool[slot]));

        let write_back = match frame {
            Some(frame_number) if dirty => {
                let wb = WriteBack {
                    page_number: victim,
                    frame_number,
                    disk_location,
                };
                debug!(
                    "write-back: page {} from frame {} to disk {}",
                    wb.page_number, wb.frame_number, wb.disk_location
                );
                self.stats.write_backs += 1;
                Some(wb)
            }
            _ => None,
        };

        (victim, slot, write_back)
    }

    fn entry_mut(&mut self, page_number: usize) -> &mut PageTableEntry {
        self.page_table
            .get_mut(page_number)
            .expect("page number checked against table length")
    }

    /// Snapshot of the whole page table, in page order
    pub fn page_table(&self) -> Vec<PageTableEntry> {
        self.page_table.snapshot()
    }

    pub fn entry(&self, page_number: usize) -> Option<&PageTableEntry> {
        self.page_table.get(page_number)
    }

    /// Resident pages, oldest first
    pub fn resident_pages(&self) -> Vec<usize> {
        self.fifo_queue.iter().copied().collect()
    }

    /// Frames in use, in the same order as [`PagingEngine::resident_pages`]
    pub fn resident_frames(&self) -> Vec<u32> {
        self.used_frame_slots
            .iter()
            .map(|&slot| self.frame_pool[slot])
            .collect()
    }

    /// Pool frames never handed out yet
    pub fn free_frames(&self) -> &[u32] {
        &self.frame_pool[self.used_frame_slots.len()..]
    }

    pub fn stats(&self) -> AccessStats {
        self.stats
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_engine() -> PagingEngine {
        PagingEngine::new(PagingConfig::default(), &[5, 12, 33, 47]).unwrap()
    }

    #[test]
    fn test_va_decomposition() {
        let va = VirtualAddress::from_raw(2 * 1024 + 100, 10);
        assert_eq!(va.page, 2);
        assert_eq!(va.offset, 100);

        let va = VirtualAddress::from_raw(1023, 10);
        assert_eq!((va.page, va.offset), (0, 1023));

        let display = format!("{}", VirtualAddress::from_raw(2 * 1024 + 100, 10));
        assert!(display.contains("page=2"));
        assert!(display.contains("offset=100"));
    }

    #[test]
    fn test_new_engine_is_empty() {
        let engine = scenario_engine();
        assert!(engine.resident_pages().is_empty());
        assert!(engine.resident_frames().is_empty());
        assert_eq!(engine.free_frames(), &[5, 12, 33, 47]);
        assert_eq!(engine.page_table().len(), 64);
        assert!(engine.page_table().iter().all(|e| !e.present));
        assert_eq!(engine.entry(9).unwrap().disk_location(), "009");
    }

    #[test]
    fn test_new_rejects_count_mismatch() {
        let err = PagingEngine::new(PagingConfig::default(), &[5, 12, 33]).unwrap_err();
        assert_eq!(err, ConfigurationError::FrameCountMismatch { budget: 4, supplied: 3 });
    }

    #[test]
    fn test_new_rejects_bad_frames() {
        let err = PagingEngine::new(PagingConfig::default(), &[5, 12, 5, 47]).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateFrame(5));

        let err = PagingEngine::new(PagingConfig::default(), &[5, 12, 64, 47]).unwrap_err();
        assert_eq!(err, ConfigurationError::FrameOutOfRange { frame: 64, blocks: 64 });
    }

    #[test]
    fn test_with_defaults_sizes_budget() {
        let engine = PagingEngine::with_defaults(&[1, 2]).unwrap();
        assert_eq!(engine.config().frame_budget, 2);
        assert!(PagingEngine::with_defaults(&[]).is_err());
    }

    // =========================================================================
    // Six-step walk-through: budget 4, pool [5, 12, 33, 47]
    // =========================================================================

    #[test]
    fn test_scenario_walkthrough() {
        let mut engine = scenario_engine();

        let r = engine.translate_access(2, 100, false).unwrap();
        assert!(r.page_fault);
        assert_eq!(r.entry.frame_number, Some(5));
        assert_eq!(r.physical_address, 5220);
        assert_eq!(r.evicted, None);

        let r = engine.translate_access(7, 50, true).unwrap();
        assert!(r.page_fault);
        assert_eq!(r.entry.frame_number, Some(12));
        assert_eq!(r.physical_address, 12338);
        assert!(r.entry.modified);
        assert_eq!(r.evicted, None);

        let r = engine.translate_access(9, 0, false).unwrap();
        assert!(r.page_fault);
        assert_eq!(r.physical_address, 33792);

        let r = engine.translate_access(4, 10, false).unwrap();
        assert!(r.page_fault);
        assert_eq!(r.entry.frame_number, Some(47));
        assert_eq!(r.physical_address, 48138);
        assert_eq!(r.evicted, None);
        assert_eq!(engine.resident_pages(), vec![2, 7, 9, 4]);
        assert!(engine.free_frames().is_empty());

        let r = engine.translate_access(1, 0, false).unwrap();
        assert!(r.page_fault);
        assert_eq!(r.evicted, Some(2));
        assert_eq!(r.write_back, None);
        assert_eq!(r.entry.frame_number, Some(5));
        assert_eq!(r.physical_address, 5120);
        assert_eq!(engine.resident_pages(), vec![7, 9, 4, 1]);
        assert!(!engine.entry(2).unwrap().present);

        let r = engine.translate_access(7, 0, false).unwrap();
        assert!(!r.page_fault);
        assert_eq!(r.physical_address, 12288);
        assert_eq!(r.evicted, None);

        let stats = engine.stats();
        assert_eq!(stats.accesses, 6);
        assert_eq!(stats.faults, 5);
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_dirty_eviction_reports_write_back() {
        let mut engine = scenario_engine();
        engine.translate_access(7, 0, true).unwrap();
        for page in [1, 2, 3] {
            engine.translate_access(page, 0, false).unwrap();
        }

        let r = engine.translate_access(8, 0, false).unwrap();
        assert_eq!(r.evicted, Some(7));
        assert_eq!(
            r.write_back,
            Some(WriteBack {
                page_number: 7,
                frame_number: 5,
                disk_location: "007".to_string(),
            })
        );
        assert_eq!(engine.stats().write_backs, 1);
    }

    #[test]
    fn test_single_frame_cycles_through_pages() {
        let mut engine = PagingEngine::with_defaults(&[10]).unwrap();
        engine.translate_access(0, 0, true).unwrap();

        for page in 1..5 {
            let r = engine.translate_access(page, 7, false).unwrap();
            assert_eq!(r.evicted, Some(page - 1));
            assert_eq!(r.physical_address, 10 * 1024 + 7);
            assert_eq!(engine.resident_pages(), vec![page]);
            assert_eq!(engine.resident_frames(), vec![10]);
            assert!(!engine.entry(page - 1).unwrap().present);
        }
        // only page 0 was ever written
        assert_eq!(engine.stats().write_backs, 1);
        assert_eq!(engine.stats().evictions, 4);
    }

    #[test]
    fn test_hit_write_sets_modified() {
        let mut engine = scenario_engine();
        engine.translate_access(3, 0, false).unwrap();
        assert!(!engine.entry(3).unwrap().modified);

        let r = engine.translate_access(3, 8, true).unwrap();
        assert!(!r.page_fault);
        assert!(r.entry.modified);

        // a later read leaves the bit alone
        let r = engine.translate_access(3, 9, false).unwrap();
        assert!(r.entry.modified);
    }

    #[test]
    fn test_refault_clears_stale_modified() {
        let mut engine = PagingEngine::with_defaults(&[10]).unwrap();
        engine.translate_access(0, 0, true).unwrap();
        engine.translate_access(1, 0, false).unwrap();

        let r = engine.translate_access(0, 0, false).unwrap();
        assert!(r.page_fault);
        assert_eq!(r.evicted, Some(1));
        assert!(!r.entry.modified);
    }

    #[test]
    fn test_out_of_range_leaves_state_untouched() {
        let mut engine = scenario_engine();
        engine.translate_access(2, 0, false).unwrap();
        let before = engine.page_table();

        assert_eq!(
            engine.translate_access(64, 0, false).unwrap_err(),
            OutOfRangeError::PageOutOfRange { page: 64, num_pages: 64 }
        );
        assert_eq!(
            engine.translate_access(3, 1024, true).unwrap_err(),
            OutOfRangeError::OffsetOutOfRange { offset: 1024, page_size: 1024 }
        );

        assert_eq!(engine.page_table(), before);
        assert_eq!(engine.resident_pages(), vec![2]);
        assert_eq!(engine.stats().accesses, 1);
    }

    #[test]
    fn test_translate_address() {
        let mut engine = scenario_engine();
        let r = engine.translate_address(2 * 1024 + 100, false).unwrap();
        assert_eq!(r.entry.page_number(), 2);
        assert_eq!(r.physical_address, 5220);

        assert!(matches!(
            engine.translate_address(64 * 1024, false),
            Err(OutOfRangeError::PageOutOfRange { page: 64, .. })
        ));
    }

    #[test]
    fn test_small_page_geometry() {
        let config = PagingConfig::default()
            .with_page_size(256)
            .with_job_size(4 * 256)
            .with_memory_size(8 * 256)
            .with_frame_budget(2);
        let mut engine = PagingEngine::new(config, &[6, 3]).unwrap();

        let r = engine.translate_access(1, 255, false).unwrap();
        assert_eq!(r.physical_address, 6 * 256 + 255);
        assert!(engine.translate_access(4, 0, false).is_err());
        assert!(engine.translate_access(0, 256, false).is_err());
    }

    #[test]
    fn test_fault_rate() {
        assert_eq!(AccessStats::default().fault_rate(), 0.0);
        let stats = AccessStats { accesses: 4, faults: 1, evictions: 0, write_backs: 0 };
        assert_eq!(stats.fault_rate(), 0.25);
    }
}
