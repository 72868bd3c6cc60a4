//! Instruction lists and the trace produced by running them through the engine.

use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::error::OutOfRangeError;
use crate::translation::{AccessResult, PagingEngine};

/// Operation carried by an instruction. Only `Save` writes to its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Load,
    Save,
}

impl Operation {
    #[inline]
    pub fn is_write(self) -> bool {
        matches!(self, Operation::Save)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "*",
            Operation::Div => "/",
            Operation::Load => "load",
            Operation::Save => "save",
        }
    }
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "+" => Ok(Operation::Add),
            "-" => Ok(Operation::Sub),
            "*" => Ok(Operation::Mul),
            "/" => Ok(Operation::Div),
            "load" | "取" | "取(load)" => Ok(Operation::Load),
            "save" | "存" | "存(save)" => Ok(Operation::Save),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub index: usize,
    pub operation: Operation,
    pub page_number: usize,
    pub offset: usize,
}

/// How an access was served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Hit,
    /// Fault served from a frame that was still free
    Allocated,
    Replaced { evicted: usize },
}

impl FaultKind {
    pub fn from_result(result: &AccessResult) -> Self {
        match (result.page_fault, result.evicted) {
            (false, _) => FaultKind::Hit,
            (true, None) => FaultKind::Allocated,
            (true, Some(evicted)) => FaultKind::Replaced { evicted },
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Hit => write!(f, "no fault"),
            FaultKind::Allocated => write!(f, "page fault, new frame allocated"),
            FaultKind::Replaced { evicted } => write!(f, "page fault, evicted page {}", evicted),
        }
    }
}

/// One executed instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub instruction: Instruction,
    pub physical_address: usize,
    pub fault: FaultKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub records: Vec<TraceRecord>,
    /// Instructions skipped because they addressed outside the job
    pub rejected: Vec<(Instruction, OutOfRangeError)>,
}

/// Execute a single instruction against the engine
pub fn execute(
    engine: &mut PagingEngine,
    instruction: Instruction,
) -> Result<TraceRecord, OutOfRangeError> {
    let result = engine.translate_access(
        instruction.page_number,
        instruction.offset,
        instruction.operation.is_write(),
    )?;
    Ok(TraceRecord {
        instruction,
        physical_address: result.physical_address,
        fault: FaultKind::from_result(&result),
    })
}

/// Run every instruction in order. Out-of-range instructions are skipped and
/// reported; the rest of the list still runs.
pub fn run_instructions(engine: &mut PagingEngine, instructions: &[Instruction]) -> RunReport {
    run_instructions_with(engine, instructions, |_, _| {})
}

/// Like [`run_instructions`], calling `on_record` after each executed
/// instruction with the engine as it stands after that access.
pub fn run_instructions_with<F>(
    engine: &mut PagingEngine,
    instructions: &[Instruction],
    mut on_record: F,
) -> RunReport
where
    F: FnMut(&TraceRecord, &PagingEngine),
{
    let mut report = RunReport::default();
    for &instruction in instructions {
        match execute(engine, instruction) {
            Ok(record) => {
                on_record(&record, engine);
                report.records.push(record);
            }
            Err(e) => {
                warn!("skipping instruction {}: {}", instruction.index, e);
                report.rejected.push((instruction, e));
            }
        }
    }
    report
}
