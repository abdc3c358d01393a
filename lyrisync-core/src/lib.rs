pub mod config;
pub mod debounce;
pub mod entry;
pub mod error;
pub mod export;
pub mod identify;
pub mod paths;
pub mod playback;
pub mod reconcile;
pub mod resolver;
pub mod session;
pub mod store;
pub mod time;
pub mod view;

pub use config::{EditorConfig, ExportConfig, IdentifyConfig, SyncConfig};
pub use debounce::{DraftDebouncer, DEFAULT_DEBOUNCE};
pub use entry::{EntryId, IdAllocator, LyricEntry};
pub use error::{CoreError, Result};
pub use export::{render_lrc, suggested_filename};
pub use identify::{
    resolve_track_metadata, IdentifyOutcome, TrackIdentifier, TrackMetadata,
    PLACEHOLDER_COVER_URL, UNKNOWN_ARTIST,
};
pub use paths::{config_dir, config_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use playback::{AudioPlayer, PlayerState};
pub use reconcile::reconcile;
pub use resolver::active_line_index;
pub use session::{SessionEvent, SessionOptions, SyncSession};
pub use store::EntryStore;
pub use time::{clock_timestamp, lrc_timestamp, offset_by_millis};
pub use view::{filter_entries, FilterMode, SyncCounts};
