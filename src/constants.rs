//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Page fetch tool constants
pub mod fetch {
    /// Request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 15;

    /// Maximum characters of page text handed back to the model
    pub const MAX_CHARS: usize = 12_000;

    /// Appended when page text was cut at `MAX_CHARS`
    pub const TRUNCATION_MARKER: &str = "\n\n[... tekst ingekort ...]";

    /// Elements whose whole subtree is dropped before text extraction
    pub const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];

    /// Browser-like user agent; many vendor sites block obvious bots
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
}

/// Web search constants
pub mod search {
    /// Results requested by the agent's search tool
    pub const AGENT_MAX_RESULTS: usize = 10;

    /// Results requested by the tool finder
    pub const FINDER_MAX_RESULTS: usize = 8;

    /// Maximum candidates returned by the tool finder
    pub const FINDER_MAX_CANDIDATES: usize = 3;

    /// Request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 15;

    /// Query length bounds accepted by `/api/search-tool`
    pub const MIN_QUERY_CHARS: usize = 1;
    pub const MAX_QUERY_CHARS: usize = 100;

    pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
    pub const BING_API_URL: &str = "https://api.bing.microsoft.com/v7.0/search";
}

/// Agent loop and progress constants
pub mod agent {
    /// Maximum model calls per check
    pub const DEFAULT_MAX_TURNS: usize = 25;

    /// Sampling temperature for the compliance agent
    pub const DEFAULT_TEMPERATURE: f32 = 0.1;

    /// Capacity of the runner and agent event channels
    pub const EVENT_CHANNEL_CAPACITY: usize = 32;

    /// Progress emitted before the agent starts
    pub const START_PROGRESS: f32 = 0.05;

    /// Progress emitted while parsing the final answer
    pub const PARSING_PROGRESS: f32 = 0.95;

    /// Progress emitted once the result is ready
    pub const DONE_PROGRESS: f32 = 1.0;

    /// Simulated progress advanced once per tool invocation.
    /// Tool calls beyond the last entry emit nothing.
    pub const TOOL_PROGRESS_SCHEDULE: [(f32, &str); 8] = [
        (0.1, "Zoeken naar officiële website..."),
        (0.2, "Privacy policy ophalen..."),
        (0.3, "Security documentatie analyseren..."),
        (0.5, "Sub-verwerkers identificeren..."),
        (0.6, "Sub-verwerkers doorzoeken..."),
        (0.7, "Datarechten beoordelen..."),
        (0.8, "Beveiligingscertificaten checken..."),
        (0.9, "Eindoordeel bepalen..."),
    ];
}

/// Result store constants
pub mod store {
    /// Maximum cached results before the oldest is evicted
    pub const DEFAULT_MAX_ENTRIES: usize = 500;

    /// Result lifetime (seconds), 24 hours
    pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;
}

/// Email notifier constants
pub mod email {
    pub const API_VERSION: &str = "2023-03-31";

    pub const DEFAULT_RECIPIENT: &str = "data.team@samhoud.com";

    /// Status polls after the send request was accepted
    pub const DEFAULT_POLL_ATTEMPTS: usize = 10;

    /// Delay between status polls (milliseconds)
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
}

/// HTTP/Network constants
pub mod network {
    /// Default LLM request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub const DEFAULT_HOST: &str = "0.0.0.0";

    pub const DEFAULT_PORT: u16 = 8000;

    /// Development frontend origin, always allowed by CORS
    pub const DEV_FRONTEND_ORIGIN: &str = "http://localhost:5173";
}

/// Report constants
pub mod report {
    pub const MIME_TYPE: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    pub const FILENAME_PREFIX: &str = "compliance-rapport-";
}
