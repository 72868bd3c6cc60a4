use crate::constants::*;
use crate::error::ConfigurationError;

/// Geometry and frame budget for one simulated job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub page_size: usize,
    pub max_job_size: usize,
    pub memory_size: usize,
    pub frame_budget: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            page_size: PAGE_SIZE,
            max_job_size: MAX_JOB_SIZE,
            memory_size: MEMORY_SIZE,
            frame_budget: DEFAULT_FRAME_BUDGET,
        }
    }
}

impl PagingConfig {
    pub fn with_frame_budget(mut self, frame_budget: usize) -> Self {
        self.frame_budget = frame_budget;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_job_size(mut self, max_job_size: usize) -> Self {
        self.max_job_size = max_job_size;
        self
    }

    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    /// Number of virtual pages in the job
    #[inline]
    pub fn num_pages(&self) -> usize {
        self.max_job_size / self.page_size
    }

    /// Number of physical blocks (frames) in memory
    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.memory_size / self.page_size
    }

    /// log2 of the page size, i.e. the shift applied to a frame number
    #[inline]
    pub fn offset_bits(&self) -> u32 {
        self.page_size.trailing_zeros()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.page_size == 0 || !self.page_size.is_power_of_two() {
            return Err(ConfigurationError::InvalidPageSize(self.page_size));
        }
        if self.max_job_size == 0 || self.max_job_size % self.page_size != 0 {
            return Err(ConfigurationError::InvalidJobSize {
                size: self.max_job_size,
                page_size: self.page_size,
            });
        }
        if self.memory_size == 0 || self.memory_size % self.page_size != 0 {
            return Err(ConfigurationError::InvalidMemorySize {
                size: self.memory_size,
                page_size: self.page_size,
            });
        }
        if self.frame_budget == 0 {
            return Err(ConfigurationError::ZeroFrameBudget);
        }
        if self.frame_budget > self.num_blocks() {
            return Err(ConfigurationError::BudgetExceedsMemory {
                budget: self.frame_budget,
                blocks: self.num_blocks(),
            });
        }
        Ok(())
    }
}
