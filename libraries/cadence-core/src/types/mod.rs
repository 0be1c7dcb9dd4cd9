mod account;
mod catalog;
mod library;
mod page;

pub use account::{
    Account, AccountId, AccountProfile, AccountSummary, AuthSession, Identity, NewAccount,
};
pub use catalog::{
    Artist, ArtistId, ArtistStats, ArtistSummary, Category, CategoryId, CategorySummary, Music,
    MusicFilter, MusicId, MusicType, NewArtist, NewCategory, NewMusic, UpdateArtist,
    UpdateCategory, UpdateMusic,
};
pub use library::{
    DashboardStats, Favorite, HistoryEntry, MyListEntry, NewPlaylist, Playlist, PlaylistEntry,
    PlaylistId, PlaylistSort, SortDirection, SortField, UpdatePlaylist,
};
pub use page::{Page, PageRequest};
