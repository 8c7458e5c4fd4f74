/// Name of the session cookie issued on login.
pub const SESSION_COOKIE: &str = "portfolio_session";

/// Per-file upload cap in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum number of gallery files accepted per request.
pub const MAX_GALLERY_FILES: usize = 10;

/// File extensions accepted for image uploads (lowercase).
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// Declared content types accepted for image uploads.
pub const ALLOWED_IMAGE_MIMES: [&str; 5] =
    ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];
