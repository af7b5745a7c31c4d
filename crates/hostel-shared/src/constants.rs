/// Application name
pub const APP_NAME: &str = "Hostel Complaint System";

/// Address the complaint contract is deployed at (local development chain)
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x94fa2f8CDBe1Ea95F11B5c872b4A448D8033e2E6";

/// Backend path serving the contract interface descriptor
pub const CONTRACT_ABI_PATH: &str = "/api/contract/abi";

/// Backend path starting the Google OAuth redirect
pub const GOOGLE_AUTH_PATH: &str = "/auth/google";

/// Backend paths for auxiliary records
pub const COMPLAINT_IMAGES_PATH: &str = "/api/complaints/images";
pub const ANNOUNCEMENTS_PATH: &str = "/api/announcements";

/// Local storage key holding the connected wallet address
pub const WALLET_STORAGE_KEY: &str = "walletAccount";

/// Contract function names
pub const FN_RAISE_COMPLAINT: &str = "raiseComplaint";
pub const FN_SUBMIT_REVIEW: &str = "submitReview";
pub const FN_GET_ALL_COMPLAINTS: &str = "getAllComplaints";

/// Maximum complaint image size in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Default backend HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 4000;
