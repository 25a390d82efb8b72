//! Service layer: credentials, firmware download, firmware lookup and flashing

pub mod credentials;
pub mod firmware_fetcher;
pub mod firmware_locator;
pub mod flash_sequencer;

pub use credentials::{CredentialCache, PrivilegeEscalator, SudoEscalator};
pub use firmware_fetcher::{DownloadOutcome, FirmwareFetcher};
pub use firmware_locator::find_firmware;
pub use flash_sequencer::{FlashSequencer, FlashState, SequencerSettings};
