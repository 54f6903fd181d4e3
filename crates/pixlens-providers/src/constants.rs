//! Provider-wide constants

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Error message prefix for request timeouts
pub const ERROR_MSG_REQUEST_TIMEOUT: &str = "no response within";

/// Embedding dimensions for nvidia/nvclip
pub const EMBEDDING_DIMENSION_NVCLIP: usize = 512;
/// Embedding dimensions for nvidia/nv-dinov2
pub const EMBEDDING_DIMENSION_NV_DINOV2: usize = 1024;
/// Embedding dimensions for OpenAI text-embedding-3-small
pub const EMBEDDING_DIMENSION_OPENAI_SMALL: usize = 1536;
/// Embedding dimensions for OpenAI text-embedding-3-large
pub const EMBEDDING_DIMENSION_OPENAI_LARGE: usize = 3072;
/// Embedding dimensions for OpenAI text-embedding-ada-002
pub const EMBEDDING_DIMENSION_OPENAI_ADA: usize = 1536;
/// Embedding dimensions for Gemini text-embedding-004
pub const EMBEDDING_DIMENSION_GEMINI: usize = 768;
/// Embedding dimensions for the null test provider
pub const EMBEDDING_DIMENSION_NULL: usize = 384;

/// Maximum query/input characters accepted by remote providers before
/// truncation
pub const MAX_INPUT_CHARS: usize = 8192;

/// File name of the index manifest inside a persisted index directory
pub const INDEX_MANIFEST_FILE: &str = "manifest.json";
/// File name of the raw vector blob inside a persisted index directory
pub const INDEX_VECTORS_FILE: &str = "vectors.bin";
/// On-disk format version written to and expected from the manifest
pub const INDEX_FORMAT_VERSION: u32 = 1;
/// Bytes per stored vector component (little-endian f32)
pub const INDEX_BYTES_PER_DIMENSION: usize = 4;

/// Keyword fallback weight for a query token matching a tag
pub const KEYWORD_WEIGHT_TAG: f32 = 1.0;
/// Keyword fallback weight for a query token matching the description
pub const KEYWORD_WEIGHT_DESCRIPTION: f32 = 0.6;
/// Keyword fallback weight for a query token matching the file name
pub const KEYWORD_WEIGHT_FILENAME: f32 = 0.4;
/// Minimum token length kept by the keyword tokenizer
pub const KEYWORD_TOKEN_MIN_LENGTH: usize = 2;
