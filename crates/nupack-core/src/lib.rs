//! Package archive assembly for `.nupkg` containers.
//!
//! [`pack::pack`] turns a [`Manifest`] and a base directory into the bytes of
//! an OPC package; [`push::push_package`] uploads those bytes to a package
//! source.
//!
//! ## Archive layout
//!
//! | Path | Content |
//! |---|---|
//! | `<id>.nuspec` | The manifest document |
//! | selector-resolved paths | Content files |
//! | `package/services/metadata/core-properties/<32 hex>.psmdcp` | Core properties |
//! | `_rels/.rels` | Relationships index |
//! | `[Content_Types].xml` | Content-type declaration, always written last |

pub mod archive;
pub mod content_types;
pub mod core_properties;
pub mod error;
pub mod pack;
#[cfg(feature = "network")]
pub mod push;
pub mod relationships;
pub mod selector;

pub use error::{PackError, PackStage};
pub use nupack_schema::{FileRule, Manifest, ManifestError, NuSpec};
pub use pack::{pack, pack_with_rng, package_file_name, write_package};

/// Generator tag recorded in the metadata part and sent as the User-Agent.
pub const USER_AGENT: &str = concat!("nupack/", env!("CARGO_PKG_VERSION"));

/// Characters used for randomized part names and relationship ids.
const HEX_ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Draw `len` characters from the lowercase hex alphabet.
///
/// Not cryptographically strong; only needs to be unique per build.
pub(crate) fn random_hex<R: rand::Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(HEX_ALPHABET[rng.random_range(0..HEX_ALPHABET.len())]))
        .collect()
}
