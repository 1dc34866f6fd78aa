use core::fmt;

/// No known function encloses the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolNotFound;

impl fmt::Display for SymbolNotFound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "No symbol for address")
    }
}

/// Source identity of an instruction address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo<'a> {
    /// Name storage; may run past the function name, only `name_len` bytes belong to it.
    pub name: &'a str,
    pub name_len: usize,
    pub start: usize,
    pub file: &'a str,
    pub line: u32,
}

impl<'a> SymbolInfo<'a> {
    pub fn function_name(&self) -> &'a str {
        let len = self.name_len.min(self.name.len());
        self.name.get(..len).unwrap_or(self.name)
    }

    pub fn offset_of(&self, addr: usize) -> usize {
        addr.wrapping_sub(self.start)
    }
}

pub trait SymbolResolver {
    fn resolve(&self, addr: usize) -> Result<SymbolInfo<'_>, SymbolNotFound>;
}

/// Resolver for images loaded without a symbol table.
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn resolve(&self, _addr: usize) -> Result<SymbolInfo<'_>, SymbolNotFound> {
        Err(SymbolNotFound)
    }
}

/// One line-table row: code at `offset` from the function start comes from `line`.
#[derive(Debug, Clone, Copy)]
pub struct LineEntry {
    pub offset: usize,
    pub line: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct FunctionSymbol<'a> {
    pub name: &'a str,
    pub start: usize,
    pub len: usize,
    pub file: &'a str,
    /// Sorted by offset.
    pub lines: &'a [LineEntry],
}

impl<'a> FunctionSymbol<'a> {
    fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr - self.start < self.len
    }

    fn line_at(&self, offset: usize) -> u32 {
        let idx = self.lines.partition_point(|entry| entry.offset <= offset);
        match idx {
            0 => 0,
            n => self.lines[n - 1].line,
        }
    }
}

/// Function table sorted by start address, searched by bisection.
pub struct SymbolTable<'a> {
    functions: &'a [FunctionSymbol<'a>],
}

impl<'a> SymbolTable<'a> {
    /// `functions` must be sorted by `start` and must not overlap.
    pub const fn new(functions: &'a [FunctionSymbol<'a>]) -> Self {
        SymbolTable { functions }
    }
}

impl<'a> SymbolResolver for SymbolTable<'a> {
    fn resolve(&self, addr: usize) -> Result<SymbolInfo<'_>, SymbolNotFound> {
        // Last function starting at or below addr.
        let idx = self.functions.partition_point(|func| func.start <= addr);
        let func = match idx {
            0 => return Err(SymbolNotFound),
            n => &self.functions[n - 1],
        };
        if !func.contains(addr) {
            return Err(SymbolNotFound);
        }
        Ok(SymbolInfo {
            name: func.name,
            name_len: func.name.len(),
            start: func.start,
            file: func.file,
            line: func.line_at(addr - func.start),
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const MONITOR_LINES: &[LineEntry] = &[
        LineEntry { offset: 0, line: 170 },
        LineEntry { offset: 0x12, line: 174 },
        LineEntry { offset: 0x40, line: 180 },
    ];

    pub const FUNCTIONS: &[FunctionSymbol<'static>] = &[
        FunctionSymbol { name: "kernel_main", start: 0x1000, len: 0x80, file: "src/lib.rs", lines: &[LineEntry { offset: 0, line: 14 }] },
        FunctionSymbol { name: "monitor", start: 0x1100, len: 0x60, file: "src/shell/mod.rs", lines: MONITOR_LINES },
        FunctionSymbol { name: "run_command", start: 0x1160, len: 0x20, file: "src/shell/mod.rs", lines: &[] },
    ];

    pub fn table() -> SymbolTable<'static> {
        SymbolTable::new(FUNCTIONS)
    }
}
