pub mod stack;
pub mod symbols;
pub mod unwind;

pub use stack::{RawStack, StackMemory};
pub use symbols::{FunctionSymbol, LineEntry, NoSymbols, SymbolInfo, SymbolNotFound, SymbolResolver, SymbolTable};
pub use unwind::{unwind, Backtrace, Frame, ARG_WINDOW};
