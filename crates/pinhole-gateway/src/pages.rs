//! Static HTML served by the gateway.

/// The front page with the shortening form.
pub const INDEX: &str = include_str!("../assets/index.html");

pub const NOT_FOUND: &str = r#"<!DOCTYPE html><html><head><title>404 Not Found</title></head>
<body><h1>404 - Not Found</h1><p>The link you followed may be broken, or the page may have been removed.</p>
<p><a href="/">Back to Home</a></p></body></html>
"#;

pub const INTERNAL_ERROR: &str = r#"<!DOCTYPE html><html><head><title>500 Internal Server Error</title></head>
<body><h1>500 - Internal Server Error</h1><p>Sorry, something went wrong on our server. Please try again later.</p></body></html>
"#;

pub const SERVICE_UNAVAILABLE: &str = r#"<!DOCTYPE html><html><head><title>Error</title></head>
<body><h1>Service Unavailable</h1><p>Could not connect to the database.</p></body></html>
"#;
