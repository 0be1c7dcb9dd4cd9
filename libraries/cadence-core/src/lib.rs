//! Cadence Core
//!
//! Platform-agnostic domain types, collaborator traits, and the credential
//! lifecycle manager for the Cadence music streaming backend.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Account`, `Music`, `Playlist`, `Page`, etc.
//! - **Collaborator Traits**: `AccountStore`, `PasswordHasher`, `TokenIssuer`, `Notifier`
//! - **Credential Manager**: registration, login, email verification, password reset
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! Nothing in this crate performs I/O directly. Persistence, hashing, token
//! signing and email delivery are injected through the traits in [`traits`].
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{PageRequest, Page};
//!
//! let request = PageRequest::new(0, 20);
//! let page: Page<u32> = Page::new(vec![1, 2, 3], request, 3);
//! assert_eq!(page.total_pages, 1);
//! ```

#![forbid(unsafe_code)]

pub mod credentials;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use credentials::{CredentialManager, TokenPolicy};
pub use error::{CadenceError, Result};
pub use traits::{AccountStore, Notifier, PasswordHasher, TokenIssuer};

pub use types::{
    // Accounts
    Account, AccountId, AccountProfile, AccountSummary, AuthSession, Identity, NewAccount,
    // Catalog
    Artist, ArtistId, ArtistStats, ArtistSummary, Category, CategoryId, CategorySummary, Music,
    MusicFilter, MusicId, MusicType, NewArtist, NewCategory, NewMusic, UpdateArtist,
    UpdateCategory, UpdateMusic,
    // Library
    DashboardStats, Favorite, HistoryEntry, MyListEntry, NewPlaylist, Playlist, PlaylistEntry,
    PlaylistId, PlaylistSort, SortDirection, SortField, UpdatePlaylist,
    // Pagination
    Page, PageRequest,
};
