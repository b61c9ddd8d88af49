//! Structural operations and sequence combinators over the value model
//! defined in `scheme-core`: cycle-safe list walking, `equal?`, deep
//! copy, `display`/`write`/`pretty-print`, the cons-list primitive
//! family, the polymorphic list/vector/string combinator algebra, and
//! the lazy stream layer.

pub mod combinators;
pub mod copy;
pub mod cycle;
pub mod equal;
pub mod list_ops;
pub mod reader_iface;
pub mod seqview;
pub mod serialize;
pub mod streams;

pub use copy::deep_copy;
pub use cycle::{classify, is_circular, is_proper_list, CycleSafeIter, ListShape};
pub use equal::equal;
pub use reader_iface::Reader;
pub use serialize::{display, pretty_print, write, AtomFormat};
