//! News content ingestion.
//!
//! Content lives as flat files in a single directory, one file per post:
//!
//! ```text
//! content/news/
//! ├── pod-unveiling.mdx     # primary extension
//! ├── team-2024.md          # secondary extension
//! └── team-2024.mdx         # shadows team-2024.md
//! ```
//!
//! The file name minus extension is the post's slug. Each file may start
//! with a `---` fenced YAML block carrying `title`, `excerpt`, `date`,
//! `author`, `image` and `category`; the rest is the body.

pub mod clock;
pub mod defaults;
pub mod front_matter;
pub mod store;
pub mod unit;

pub use clock::{Clock, FixedClock, SystemClock};
pub use defaults::{MissingDate, UnitDefaults};
pub use front_matter::ParseError;
pub use store::{ContentStore, Lookup, ScanReport, StoreError};
pub use unit::{InvalidSlug, NewsMeta, NewsPost, Slug, RESERVED_SLUG};
