//! Static HTTP status catalog
//!
//! Bootstrap data for the variant registry: one entry per 4xx/5xx status
//! code with a short catalog key and the standard reason phrase, plus the
//! legacy short-code aliases service code has historically matched on.

/// One bootstrap entry: status code, catalog key and reason phrase.
///
/// The key is hyphenated lowercase and feeds the name codec: status 404
/// with key `not-found` registers the variant `HttpNotFoundError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: u16,
    pub key: &'static str,
    pub reason: &'static str,
}

/// Legacy short-code alias registered alongside the catalog variants.
///
/// These carry explicit code overrides so that clients matching on the
/// historical codes (`NOT_FOUND`, `INTERNAL`, ...) keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasEntry {
    pub code: &'static str,
    pub status: u16,
    pub message: &'static str,
}

/// IANA-registered 4xx/5xx status codes (plus 402) with reason phrases.
pub const STATUS_CATALOG: &[StatusEntry] = &[
    StatusEntry { status: 400, key: "bad-request", reason: "Bad Request" },
    StatusEntry { status: 401, key: "unauthorized", reason: "Unauthorized" },
    StatusEntry { status: 402, key: "payment-required", reason: "Payment Required" },
    StatusEntry { status: 403, key: "forbidden", reason: "Forbidden" },
    StatusEntry { status: 404, key: "not-found", reason: "Not Found" },
    StatusEntry { status: 405, key: "method-not-allowed", reason: "Method Not Allowed" },
    StatusEntry { status: 406, key: "not-acceptable", reason: "Not Acceptable" },
    StatusEntry { status: 407, key: "proxy-authentication-required", reason: "Proxy Authentication Required" },
    StatusEntry { status: 408, key: "request-timeout", reason: "Request Timeout" },
    StatusEntry { status: 409, key: "conflict", reason: "Conflict" },
    StatusEntry { status: 410, key: "gone", reason: "Gone" },
    StatusEntry { status: 411, key: "length-required", reason: "Length Required" },
    StatusEntry { status: 412, key: "precondition-failed", reason: "Precondition Failed" },
    StatusEntry { status: 413, key: "payload-too-large", reason: "Payload Too Large" },
    StatusEntry { status: 414, key: "uri-too-long", reason: "URI Too Long" },
    StatusEntry { status: 415, key: "unsupported-media-type", reason: "Unsupported Media Type" },
    StatusEntry { status: 416, key: "range-not-satisfiable", reason: "Range Not Satisfiable" },
    StatusEntry { status: 417, key: "expectation-failed", reason: "Expectation Failed" },
    StatusEntry { status: 418, key: "teapot", reason: "I'm a Teapot" },
    StatusEntry { status: 421, key: "misdirected-request", reason: "Misdirected Request" },
    StatusEntry { status: 422, key: "unprocessable-entity", reason: "Unprocessable Entity" },
    StatusEntry { status: 423, key: "locked", reason: "Locked" },
    StatusEntry { status: 424, key: "failed-dependency", reason: "Failed Dependency" },
    StatusEntry { status: 425, key: "too-early", reason: "Too Early" },
    StatusEntry { status: 426, key: "upgrade-required", reason: "Upgrade Required" },
    StatusEntry { status: 428, key: "precondition-required", reason: "Precondition Required" },
    StatusEntry { status: 429, key: "too-many-requests", reason: "Too Many Requests" },
    StatusEntry { status: 431, key: "request-header-fields-too-large", reason: "Request Header Fields Too Large" },
    StatusEntry { status: 451, key: "unavailable-for-legal-reasons", reason: "Unavailable For Legal Reasons" },
    // 500 keeps the short "internal" key: the canonical server-fault
    // variant is HttpInternalError, not HttpInternalServerError.
    StatusEntry { status: 500, key: "internal", reason: "Internal Server Error" },
    StatusEntry { status: 501, key: "not-implemented", reason: "Not Implemented" },
    StatusEntry { status: 502, key: "bad-gateway", reason: "Bad Gateway" },
    StatusEntry { status: 503, key: "service-unavailable", reason: "Service Unavailable" },
    StatusEntry { status: 504, key: "gateway-timeout", reason: "Gateway Timeout" },
    StatusEntry { status: 505, key: "http-version-not-supported", reason: "HTTP Version Not Supported" },
    StatusEntry { status: 506, key: "variant-also-negotiates", reason: "Variant Also Negotiates" },
    StatusEntry { status: 507, key: "insufficient-storage", reason: "Insufficient Storage" },
    StatusEntry { status: 508, key: "loop-detected", reason: "Loop Detected" },
    StatusEntry { status: 510, key: "not-extended", reason: "Not Extended" },
    StatusEntry { status: 511, key: "network-authentication-required", reason: "Network Authentication Required" },
];

/// Short-code aliases with their historical default messages.
pub const CODE_ALIASES: &[AliasEntry] = &[
    AliasEntry { code: "BAD_FORMAT", status: 400, message: "bad request format" },
    AliasEntry { code: "AUTHORIZATION", status: 401, message: "authorization required" },
    AliasEntry { code: "FORBIDDEN", status: 403, message: "access forbidden" },
    AliasEntry { code: "NOT_FOUND", status: 404, message: "resource not found" },
    AliasEntry { code: "CONFLICT", status: 409, message: "resource conflict" },
    AliasEntry { code: "INTERNAL", status: 500, message: "internal error" },
];

/// Look up a catalog entry by status code.
pub fn entry(status: u16) -> Option<&'static StatusEntry> {
    STATUS_CATALOG.iter().find(|e| e.status == status)
}

/// Look up the standard reason phrase for a status code.
pub fn reason_phrase(status: u16) -> Option<&'static str> {
    entry(status).map(|e| e.reason)
}

/// Whether a status code denotes a client fault (4xx).
pub fn is_client_fault(status: u16) -> bool {
    (400..500).contains(&status)
}

/// Whether a status code denotes a server fault (5xx).
pub fn is_server_fault(status: u16) -> bool {
    (500..600).contains(&status)
}
