//! The log publisher kinds the provider manages.
//!
//! Field tables are composed from groups shared between kinds. Each kind is
//! registered twice: `pingdirectory_<name>` creates and deletes the object,
//! `pingdirectory_default_<name>` only edits an object the server ships with.

use super::field::Field;
use super::{Lifecycle, ResourceAdapter};

/// Prefix of every resource type name.
pub const TYPE_PREFIX: &str = "pingdirectory_";

/// Infix marking the edit-only variant of a kind.
pub const DEFAULT_INFIX: &str = "default_";

/// Prefix of the object type URNs.
pub const URN_PREFIX: &str = "urn:pingidentity:schemas:configuration:2.0:log-publisher:";

/// One log publisher type of the configuration API.
#[derive(Debug)]
pub struct LogPublisherKind {
    /// Type name without provider prefix, e.g. `file_based_access_log_publisher`.
    pub name: &'static str,
    /// Subtype suffix of the object's schema URN, e.g. `file-based-access`.
    pub urn_suffix: &'static str,
    /// Human-readable name used in error messages.
    pub display_name: &'static str,
    /// Field groups in schema order.
    pub groups: &'static [&'static [Field]],
}

impl LogPublisherKind {
    /// The object's schema URN.
    pub fn urn(&self) -> String {
        format!("{}{}", URN_PREFIX, self.urn_suffix)
    }

    /// All fields of this kind in table order.
    pub fn fields(&self) -> impl Iterator<Item = &'static Field> + Clone {
        self.groups.iter().flat_map(|group| group.iter())
    }

    /// The field with attribute name `name`.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields().find(|f| f.name == name)
    }
}

const LOGGING_ERROR_BEHAVIORS: &[&str] = &["standard-error", "lose-messages"];
const OUTPUT_LOCATIONS: &[&str] = &["standard-output", "standard-error"];
const COMPRESSION_MECHANISMS: &[&str] = &["none", "gzip", "gzip-with-integrity-check"];
const TIMESTAMP_PRECISIONS: &[&str] = &["seconds", "milliseconds"];
const SYSLOG_FACILITIES: &[&str] = &[
    "kernel-messages",
    "user-level-messages",
    "mail-system",
    "system-daemons",
    "security-messages",
    "generated-internally-by-syslogd",
    "line-printer-subsystem",
    "network-news-subsystem",
    "uucp-subsystem",
    "clock-daemon",
    "authorization-messages",
    "ftp-daemon",
    "ntp-subsystem",
    "log-audit",
    "log-alert",
    "clock-daemon-2",
    "local-0",
    "local-1",
    "local-2",
    "local-3",
    "local-4",
    "local-5",
    "local-6",
    "local-7",
];
const SYSLOG_SEVERITIES: &[&str] = &[
    "emergency",
    "alert",
    "critical",
    "error",
    "warning",
    "notice",
    "informational",
    "debug",
];
const ERROR_SEVERITIES: &[&str] = &[
    "all",
    "debug",
    "error",
    "fatal-error",
    "info",
    "mild-error",
    "mild-warning",
    "none",
    "notice",
    "severe-error",
    "severe-warning",
    "warning",
];
const HEADER_LOGGING: &[&str] = &["none", "header-names", "header-names-and-values"];
const PARAMETER_LOGGING: &[&str] = &["none", "parameter-names", "parameter-names-and-values"];
const DEBUG_LEVELS: &[&str] = &["disabled", "error", "warning", "info", "verbose", "all"];
const DEBUG_CATEGORIES: &[&str] = &[
    "caught",
    "constructor",
    "data",
    "database-access",
    "enter",
    "exit",
    "message",
    "protocol",
    "thrown",
];
const DEBUG_MESSAGE_TYPES: &[&str] = &[
    "ldap-request",
    "ldap-response",
    "exception",
    "http-message",
    "oauth-message",
];
const HTTP_MESSAGE_TYPES: &[&str] = &[
    "request",
    "response",
    "request-body",
    "response-body",
    "cookie",
];
const TOKEN_VALIDATOR_MESSAGE_TYPES: &[&str] = &[
    "access-token-validation",
    "id-token-validation",
];
const SCIM_MESSAGE_TYPES: &[&str] = &[
    "all",
    "exception",
    "request",
    "response",
    "debug",
];

const COMMON: &[Field] = &[
    Field::string("description", "description", "A description for this Log Publisher")
        .optional(),
    Field::bool(
        "enabled",
        "enabled",
        "Indicates whether the Log Publisher is enabled for use.",
    )
    .required(),
    Field::enumeration(
        "logging_error_behavior",
        "loggingErrorBehavior",
        LOGGING_ERROR_BEHAVIORS,
        "Specifies the behavior that the server should exhibit if an error occurs during logging processing.",
    ),
];

const OPERATION_FILTERS: &[Field] = &[
    Field::bool(
        "suppress_internal_operations",
        "suppressInternalOperations",
        "Indicates whether internal operations should be excluded from the log.",
    ),
    Field::bool(
        "suppress_replication_operations",
        "suppressReplicationOperations",
        "Indicates whether access messages generated by replication operations should be excluded.",
    ),
    Field::string(
        "connection_criteria",
        "connectionCriteria",
        "Criteria that clients must match for their operations to be logged.",
    )
    .optional(),
    Field::string(
        "request_criteria",
        "requestCriteria",
        "Criteria that operation requests must match to be logged.",
    )
    .optional(),
    Field::string(
        "result_criteria",
        "resultCriteria",
        "Criteria that operation results must match to be logged.",
    )
    .optional(),
];

const ACCESS_EVENTS: &[Field] = &[
    Field::bool("log_connects", "logConnects", "Log client connection events."),
    Field::bool("log_disconnects", "logDisconnects", "Log client disconnection events."),
    Field::bool(
        "log_security_negotiation",
        "logSecurityNegotiation",
        "Log security negotiation, such as TLS handshakes.",
    ),
    Field::bool(
        "log_client_certificates",
        "logClientCertificates",
        "Log certificate chains presented by clients.",
    ),
    Field::bool("log_requests", "logRequests", "Log operation requests."),
    Field::bool("log_results", "logResults", "Log operation results."),
    Field::bool(
        "log_search_entries",
        "logSearchEntries",
        "Log search result entries returned to clients.",
    ),
    Field::bool(
        "log_search_references",
        "logSearchReferences",
        "Log search result references returned to clients.",
    ),
    Field::bool(
        "log_intermediate_responses",
        "logIntermediateResponses",
        "Log intermediate responses returned to clients.",
    ),
    Field::bool(
        "correlate_requests_and_results",
        "correlateRequestsAndResults",
        "Write request details into result messages when requests are not logged.",
    ),
    Field::string(
        "search_entry_criteria",
        "searchEntryCriteria",
        "Criteria that search result entries must match to be logged.",
    )
    .optional(),
    Field::string(
        "search_reference_criteria",
        "searchReferenceCriteria",
        "Criteria that search result references must match to be logged.",
    )
    .optional(),
];

const ACCESS_DETAILS: &[Field] = &[
    Field::bool(
        "include_request_details_in_result_messages",
        "includeRequestDetailsInResultMessages",
        "Include request details in result messages.",
    ),
    Field::bool(
        "include_request_details_in_search_entry_messages",
        "includeRequestDetailsInSearchEntryMessages",
        "Include request details in search entry messages.",
    ),
    Field::bool(
        "include_request_details_in_search_reference_messages",
        "includeRequestDetailsInSearchReferenceMessages",
        "Include request details in search reference messages.",
    ),
    Field::bool(
        "include_request_details_in_intermediate_response_messages",
        "includeRequestDetailsInIntermediateResponseMessages",
        "Include request details in intermediate response messages.",
    ),
    Field::bool(
        "include_result_code_names",
        "includeResultCodeNames",
        "Include the names of result codes.",
    ),
    Field::bool(
        "include_extended_search_request_details",
        "includeExtendedSearchRequestDetails",
        "Include the size and time limits, alias dereferencing and types-only flag of searches.",
    ),
    Field::bool(
        "include_add_attribute_names",
        "includeAddAttributeNames",
        "Include the attribute names of add requests.",
    ),
    Field::bool(
        "include_modify_attribute_names",
        "includeModifyAttributeNames",
        "Include the attribute names of modify requests.",
    ),
    Field::bool(
        "include_search_entry_attribute_names",
        "includeSearchEntryAttributeNames",
        "Include the attribute names of search result entries.",
    ),
    Field::bool(
        "include_request_controls",
        "includeRequestControls",
        "Include the OIDs of request controls.",
    ),
    Field::bool(
        "include_response_controls",
        "includeResponseControls",
        "Include the OIDs of response controls.",
    ),
    Field::bool(
        "log_assurance_completed",
        "logAssuranceCompleted",
        "Log a message when replication assurance completes.",
    ),
    Field::int64(
        "max_string_length",
        "maxStringLength",
        "Maximum number of characters written for any single string value.",
    ),
    Field::bool(
        "generify_message_strings_when_possible",
        "generifyMessageStringsWhenPossible",
        "Replace variable parts of diagnostic messages with placeholders.",
    ),
];

const SERVER_IDENTITY: &[Field] = &[
    Field::bool(
        "include_product_name",
        "includeProductName",
        "Include the product name in log messages.",
    ),
    Field::bool(
        "include_instance_name",
        "includeInstanceName",
        "Include the instance name in log messages.",
    ),
    Field::bool(
        "include_startup_id",
        "includeStartupID",
        "Include the startup ID in log messages.",
    ),
    Field::bool(
        "include_thread_id",
        "includeThreadID",
        "Include the thread ID in log messages.",
    ),
];

const REQUESTER: &[Field] = &[
    Field::bool(
        "include_requester_dn",
        "includeRequesterDN",
        "Include the DN of the authenticated user for the operation.",
    ),
    Field::bool(
        "include_requester_ip_address",
        "includeRequesterIPAddress",
        "Include the IP address of the client that requested the operation.",
    ),
];

const AUDIT: &[Field] = &[
    Field::string_set(
        "obscure_attribute",
        "obscureAttribute",
        "Attributes whose values are obscured in audit messages.",
    ),
    Field::string_set(
        "exclude_attribute",
        "excludeAttribute",
        "Attributes left out of audit messages.",
    ),
    Field::bool(
        "use_reversible_form",
        "useReversibleForm",
        "Write changes in a form that can be replayed to revert them.",
    ),
    Field::bool(
        "include_replication_change_id",
        "includeReplicationChangeID",
        "Include the replication change ID in audit messages.",
    ),
];

const JSON_FORMAT: &[Field] = &[
    Field::bool(
        "write_multi_line_messages",
        "writeMultiLineMessages",
        "Format each JSON message across multiple lines.",
    ),
    Field::string(
        "log_field_behavior",
        "logFieldBehavior",
        "The log field behavior that controls which fields are written.",
    )
    .optional(),
];

const CONSOLE: &[Field] = &[Field::enumeration(
    "output_location",
    "outputLocation",
    OUTPUT_LOCATIONS,
    "Where messages are written.",
)];

const FILE: &[Field] = &[
    Field::string("log_file", "logFile", "Path of the log file.").required(),
    Field::string(
        "log_file_permissions",
        "logFilePermissions",
        "UNIX permissions of the log files, in octal.",
    ),
    Field::string_set(
        "rotation_policy",
        "rotationPolicy",
        "Rotation policies applied to the log files.",
    ),
    Field::string_set(
        "rotation_listener",
        "rotationListener",
        "Listeners notified whenever a log file is rotated.",
    ),
    Field::string_set(
        "retention_policy",
        "retentionPolicy",
        "Retention policies applied to rotated log files.",
    ),
    Field::enumeration(
        "compression_mechanism",
        "compressionMechanism",
        COMPRESSION_MECHANISMS,
        "How log files are compressed.",
    ),
    Field::bool("sign_log", "signLog", "Digitally sign log files."),
    Field::bool("encrypt_log", "encryptLog", "Encrypt log files."),
    Field::string(
        "encryption_settings_definition_id",
        "encryptionSettingsDefinitionID",
        "Encryption settings definition used to encrypt log files.",
    )
    .optional(),
    Field::bool("append", "append", "Append to existing log files."),
    Field::bool("asynchronous", "asynchronous", "Write messages asynchronously."),
    Field::bool("auto_flush", "autoFlush", "Flush after every message."),
    Field::string("buffer_size", "bufferSize", "Size of the write buffer."),
    Field::int64(
        "queue_size",
        "queueSize",
        "Maximum number of messages held for asynchronous writing.",
    ),
    Field::string(
        "time_interval",
        "timeInterval",
        "Interval between checks for buffered messages.",
    ),
    Field::enumeration(
        "timestamp_precision",
        "timestampPrecision",
        TIMESTAMP_PRECISIONS,
        "Precision of message timestamps.",
    ),
];

const SYSLOG_TEXT: &[Field] = &[
    Field::string(
        "server_host_name",
        "serverHostName",
        "Address of the syslog server.",
    )
    .required(),
    Field::int64("server_port", "serverPort", "Port of the syslog server."),
    Field::enumeration(
        "syslog_facility",
        "syslogFacility",
        SYSLOG_FACILITIES,
        "Syslog facility of the messages.",
    ),
    Field::bool("auto_flush", "autoFlush", "Flush after every message."),
    Field::bool("asynchronous", "asynchronous", "Write messages asynchronously."),
    Field::int64(
        "queue_size",
        "queueSize",
        "Maximum number of messages held for asynchronous writing.",
    ),
    Field::string(
        "time_interval",
        "timeInterval",
        "Interval between checks for buffered messages.",
    ),
];

const SYSLOG_JSON: &[Field] = &[
    Field::string_set(
        "syslog_external_server",
        "syslogExternalServer",
        "External syslog servers that receive the messages.",
    )
    .required(),
    Field::enumeration(
        "syslog_facility",
        "syslogFacility",
        SYSLOG_FACILITIES,
        "Syslog facility of the messages.",
    ),
    Field::enumeration(
        "syslog_severity",
        "syslogSeverity",
        SYSLOG_SEVERITIES,
        "Syslog severity of the messages.",
    ),
    Field::string(
        "syslog_message_host_name",
        "syslogMessageHostName",
        "Local host name placed in syslog messages.",
    )
    .optional(),
    Field::string(
        "syslog_message_application_name",
        "syslogMessageApplicationName",
        "Application name placed in syslog messages.",
    )
    .optional(),
    Field::int64(
        "queue_size",
        "queueSize",
        "Maximum number of messages held for asynchronous writing.",
    ),
];

const ERROR: &[Field] = &[
    Field::enum_set(
        "default_severity",
        "defaultSeverity",
        ERROR_SEVERITIES,
        "Severities logged for categories without an override.",
    ),
    Field::string_set(
        "override_severity",
        "overrideSeverity",
        "Per-category severity overrides, as category=severity[,severity...].",
    ),
];

const HTTP_OPERATION: &[Field] = &[
    Field::bool("log_requests", "logRequests", "Log HTTP requests."),
    Field::bool("log_results", "logResults", "Log HTTP results."),
    Field::bool(
        "include_request_details_in_result_messages",
        "includeRequestDetailsInResultMessages",
        "Include request details in result messages.",
    ),
    Field::enumeration(
        "log_request_headers",
        "logRequestHeaders",
        HEADER_LOGGING,
        "How request headers are logged.",
    ),
    Field::string_set(
        "suppressed_request_header_name",
        "suppressedRequestHeaderName",
        "Request headers that are never logged.",
    ),
    Field::enumeration(
        "log_response_headers",
        "logResponseHeaders",
        HEADER_LOGGING,
        "How response headers are logged.",
    ),
    Field::string_set(
        "suppressed_response_header_name",
        "suppressedResponseHeaderName",
        "Response headers that are never logged.",
    ),
    Field::bool(
        "log_request_authorization_type",
        "logRequestAuthorizationType",
        "Log the authorization type of requests.",
    ),
    Field::bool(
        "log_request_cookie_names",
        "logRequestCookieNames",
        "Log the names of request cookies.",
    ),
    Field::bool(
        "log_response_cookie_names",
        "logResponseCookieNames",
        "Log the names of response cookies.",
    ),
    Field::enumeration(
        "log_request_parameters",
        "logRequestParameters",
        PARAMETER_LOGGING,
        "How request parameters are logged.",
    ),
    Field::bool(
        "log_request_protocol",
        "logRequestProtocol",
        "Log the protocol of requests.",
    ),
    Field::bool(
        "log_redirect_uri",
        "logRedirectURI",
        "Log the redirect URI of redirect responses.",
    ),
];

const TRACE: &[Field] = &[
    Field::enum_set(
        "debug_message_type",
        "debugMessageType",
        DEBUG_MESSAGE_TYPES,
        "Debug message types that are logged.",
    ),
    Field::enum_set(
        "http_message_type",
        "httpMessageType",
        HTTP_MESSAGE_TYPES,
        "HTTP message types that are logged.",
    ),
    Field::enum_set(
        "access_token_validator_message_type",
        "accessTokenValidatorMessageType",
        TOKEN_VALIDATOR_MESSAGE_TYPES,
        "Access token validator message types that are logged.",
    ),
    Field::enum_set(
        "scim_message_type",
        "scimMessageType",
        SCIM_MESSAGE_TYPES,
        "SCIM message types that are logged.",
    ),
    Field::string_set(
        "include_path_pattern",
        "includePathPattern",
        "Request paths whose messages are logged.",
    ),
    Field::string_set(
        "exclude_path_pattern",
        "excludePathPattern",
        "Request paths whose messages are never logged.",
    ),
];

const DEBUG: &[Field] = &[
    Field::enumeration(
        "default_debug_level",
        "defaultDebugLevel",
        DEBUG_LEVELS,
        "Lowest severity of debug messages logged when no target matches.",
    ),
    Field::enum_set(
        "default_debug_category",
        "defaultDebugCategory",
        DEBUG_CATEGORIES,
        "Debug categories logged when no target matches.",
    ),
    Field::bool(
        "default_omit_method_entry_arguments",
        "defaultOmitMethodEntryArguments",
        "Leave method arguments out of method entry messages.",
    ),
    Field::bool(
        "default_omit_method_return_value",
        "defaultOmitMethodReturnValue",
        "Leave return values out of method exit messages.",
    ),
    Field::bool(
        "default_include_throwable_cause",
        "defaultIncludeThrowableCause",
        "Include the cause of exceptions.",
    ),
    Field::int64(
        "default_throwable_stack_frames",
        "defaultThrowableStackFrames",
        "Number of stack frames written for exceptions.",
    ),
];

const JDBC: &[Field] = &[
    Field::string(
        "server",
        "server",
        "External database server that receives the messages.",
    )
    .required(),
    Field::string(
        "log_field_mapping",
        "logFieldMapping",
        "Mapping from log fields to database columns.",
    )
    .required(),
    Field::string(
        "log_table_name",
        "logTableName",
        "Name of the table that receives the messages.",
    ),
    Field::int64(
        "queue_size",
        "queueSize",
        "Maximum number of messages held for asynchronous writing.",
    ),
];

const SCRIPTED: &[Field] = &[
    Field::string(
        "script_class",
        "scriptClass",
        "Fully-qualified name of the Groovy class implementing the publisher.",
    )
    .required(),
    Field::string_set(
        "script_argument",
        "scriptArgument",
        "Arguments passed to the script, as name=value.",
    ),
];

const THIRD_PARTY: &[Field] = &[
    Field::string(
        "extension_class",
        "extensionClass",
        "Fully-qualified name of the Java class implementing the publisher.",
    )
    .required(),
    Field::string_set(
        "extension_argument",
        "extensionArgument",
        "Arguments passed to the extension, as name=value.",
    ),
];

/// Every kind the provider manages.
pub const KINDS: &[LogPublisherKind] = &[
    LogPublisherKind {
        name: "console_json_access_log_publisher",
        urn_suffix: "console-json-access",
        display_name: "Console JSON Access Log Publisher",
        groups: &[
            COMMON,
            CONSOLE,
            JSON_FORMAT,
            ACCESS_EVENTS,
            OPERATION_FILTERS,
            SERVER_IDENTITY,
            REQUESTER,
            ACCESS_DETAILS,
        ],
    },
    LogPublisherKind {
        name: "console_json_audit_log_publisher",
        urn_suffix: "console-json-audit",
        display_name: "Console JSON Audit Log Publisher",
        groups: &[
            COMMON,
            CONSOLE,
            JSON_FORMAT,
            AUDIT,
            OPERATION_FILTERS,
            SERVER_IDENTITY,
            REQUESTER,
        ],
    },
    LogPublisherKind {
        name: "console_json_http_operation_log_publisher",
        urn_suffix: "console-json-http-operation",
        display_name: "Console JSON HTTP Operation Log Publisher",
        groups: &[COMMON, CONSOLE, JSON_FORMAT, HTTP_OPERATION, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "console_json_error_log_publisher",
        urn_suffix: "console-json-error",
        display_name: "Console JSON Error Log Publisher",
        groups: &[COMMON, CONSOLE, JSON_FORMAT, ERROR, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "file_based_access_log_publisher",
        urn_suffix: "file-based-access",
        display_name: "File Based Access Log Publisher",
        groups: &[
            COMMON,
            FILE,
            ACCESS_EVENTS,
            OPERATION_FILTERS,
            SERVER_IDENTITY,
            REQUESTER,
            ACCESS_DETAILS,
        ],
    },
    LogPublisherKind {
        name: "file_based_audit_log_publisher",
        urn_suffix: "file-based-audit",
        display_name: "File Based Audit Log Publisher",
        groups: &[COMMON, FILE, AUDIT, OPERATION_FILTERS, SERVER_IDENTITY, REQUESTER],
    },
    LogPublisherKind {
        name: "file_based_error_log_publisher",
        urn_suffix: "file-based-error",
        display_name: "File Based Error Log Publisher",
        groups: &[COMMON, FILE, ERROR, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "file_based_trace_log_publisher",
        urn_suffix: "file-based-trace",
        display_name: "File Based Trace Log Publisher",
        groups: &[COMMON, FILE, TRACE, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "file_based_debug_log_publisher",
        urn_suffix: "file-based-debug",
        display_name: "File Based Debug Log Publisher",
        groups: &[COMMON, FILE, DEBUG],
    },
    LogPublisherKind {
        name: "jdbc_based_access_log_publisher",
        urn_suffix: "jdbc-based-access",
        display_name: "JDBC Based Access Log Publisher",
        groups: &[COMMON, JDBC, ACCESS_EVENTS, OPERATION_FILTERS, ACCESS_DETAILS],
    },
    LogPublisherKind {
        name: "jdbc_based_error_log_publisher",
        urn_suffix: "jdbc-based-error",
        display_name: "JDBC Based Error Log Publisher",
        groups: &[COMMON, JDBC, ERROR],
    },
    LogPublisherKind {
        name: "syslog_based_access_log_publisher",
        urn_suffix: "syslog-based-access",
        display_name: "Syslog Based Access Log Publisher",
        groups: &[
            COMMON,
            SYSLOG_TEXT,
            ACCESS_EVENTS,
            OPERATION_FILTERS,
            SERVER_IDENTITY,
            REQUESTER,
            ACCESS_DETAILS,
        ],
    },
    LogPublisherKind {
        name: "syslog_based_error_log_publisher",
        urn_suffix: "syslog-based-error",
        display_name: "Syslog Based Error Log Publisher",
        groups: &[COMMON, SYSLOG_TEXT, ERROR, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "syslog_json_access_log_publisher",
        urn_suffix: "syslog-json-access",
        display_name: "Syslog JSON Access Log Publisher",
        groups: &[
            COMMON,
            SYSLOG_JSON,
            JSON_FORMAT,
            ACCESS_EVENTS,
            OPERATION_FILTERS,
            SERVER_IDENTITY,
            REQUESTER,
            ACCESS_DETAILS,
        ],
    },
    LogPublisherKind {
        name: "syslog_json_audit_log_publisher",
        urn_suffix: "syslog-json-audit",
        display_name: "Syslog JSON Audit Log Publisher",
        groups: &[
            COMMON,
            SYSLOG_JSON,
            JSON_FORMAT,
            AUDIT,
            OPERATION_FILTERS,
            SERVER_IDENTITY,
            REQUESTER,
        ],
    },
    LogPublisherKind {
        name: "syslog_json_http_operation_log_publisher",
        urn_suffix: "syslog-json-http-operation",
        display_name: "Syslog JSON HTTP Operation Log Publisher",
        groups: &[COMMON, SYSLOG_JSON, JSON_FORMAT, HTTP_OPERATION, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "syslog_json_error_log_publisher",
        urn_suffix: "syslog-json-error",
        display_name: "Syslog JSON Error Log Publisher",
        groups: &[COMMON, SYSLOG_JSON, JSON_FORMAT, ERROR, SERVER_IDENTITY],
    },
    LogPublisherKind {
        name: "groovy_scripted_access_log_publisher",
        urn_suffix: "groovy-scripted-access",
        display_name: "Groovy Scripted Access Log Publisher",
        groups: ACCESS_SCRIPTED,
    },
    LogPublisherKind {
        name: "groovy_scripted_error_log_publisher",
        urn_suffix: "groovy-scripted-error",
        display_name: "Groovy Scripted Error Log Publisher",
        groups: &[COMMON, SCRIPTED, ERROR],
    },
    LogPublisherKind {
        name: "groovy_scripted_http_operation_log_publisher",
        urn_suffix: "groovy-scripted-http-operation",
        display_name: "Groovy Scripted HTTP Operation Log Publisher",
        groups: &[COMMON, SCRIPTED, HTTP_OPERATION],
    },
    LogPublisherKind {
        name: "third_party_access_log_publisher",
        urn_suffix: "third-party-access",
        display_name: "Third Party Access Log Publisher",
        groups: ACCESS_THIRD_PARTY,
    },
    LogPublisherKind {
        name: "third_party_error_log_publisher",
        urn_suffix: "third-party-error",
        display_name: "Third Party Error Log Publisher",
        groups: &[COMMON, THIRD_PARTY, ERROR],
    },
    LogPublisherKind {
        name: "third_party_http_operation_log_publisher",
        urn_suffix: "third-party-http-operation",
        display_name: "Third Party HTTP Operation Log Publisher",
        groups: &[COMMON, THIRD_PARTY, HTTP_OPERATION],
    },
];

const ACCESS_SCRIPTED: &[&[Field]] = &[
    COMMON,
    SCRIPTED,
    ACCESS_EVENTS,
    OPERATION_FILTERS,
    SERVER_IDENTITY,
    REQUESTER,
    ACCESS_DETAILS,
];

const ACCESS_THIRD_PARTY: &[&[Field]] = &[
    COMMON,
    THIRD_PARTY,
    ACCESS_EVENTS,
    OPERATION_FILTERS,
    SERVER_IDENTITY,
    REQUESTER,
    ACCESS_DETAILS,
];

/// Every registered resource type, managed and edit-only.
pub fn adapters() -> impl Iterator<Item = ResourceAdapter> {
    KINDS.iter().flat_map(|kind| {
        [
            ResourceAdapter::new(kind, Lifecycle::Managed),
            ResourceAdapter::new(kind, Lifecycle::EditOnly),
        ]
    })
}

/// Look up the adapter for a resource type name.
pub fn lookup(type_name: &str) -> Option<ResourceAdapter> {
    let name = type_name.strip_prefix(TYPE_PREFIX)?;
    let (name, lifecycle) = match name.strip_prefix(DEFAULT_INFIX) {
        Some(rest) => (rest, Lifecycle::EditOnly),
        None => (name, Lifecycle::Managed),
    };
    KINDS
        .iter()
        .find(|kind| kind.name == name)
        .map(|kind| ResourceAdapter::new(kind, lifecycle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::field::{FieldKind, Presence};
    use std::collections::HashSet;

    #[test]
    fn test_kind_count() {
        assert_eq!(KINDS.len(), 23);
        assert_eq!(adapters().count(), 46);
    }

    #[test]
    fn test_field_names_unique_per_kind() {
        for kind in KINDS {
            let mut names = HashSet::new();
            let mut wires = HashSet::new();
            for field in kind.fields() {
                assert!(names.insert(field.name), "{}: duplicate {}", kind.name, field.name);
                assert!(wires.insert(field.wire), "{}: duplicate {}", kind.name, field.wire);
            }
        }
    }

    #[test]
    fn test_names_and_urns_unique() {
        let names: HashSet<_> = KINDS.iter().map(|k| k.name).collect();
        let urns: HashSet<_> = KINDS.iter().map(|k| k.urn()).collect();
        assert_eq!(names.len(), KINDS.len());
        assert_eq!(urns.len(), KINDS.len());
    }

    #[test]
    fn test_every_kind_has_common_fields() {
        for kind in KINDS {
            let enabled = kind.field("enabled").unwrap();
            assert_eq!(enabled.presence, Presence::Required);
            assert!(kind.field("description").is_some());
            assert!(kind.name.ends_with("_log_publisher"));
        }
    }

    #[test]
    fn test_only_free_text_fields_are_plain_optional() {
        for kind in KINDS {
            for field in kind.fields().filter(|f| f.presence == Presence::Optional) {
                assert_eq!(field.kind, FieldKind::String, "{}: {}", kind.name, field.name);
            }
        }

        let file_access = lookup("pingdirectory_file_based_access_log_publisher")
            .unwrap()
            .kind();
        for name in ["encrypt_log", "sign_log", "queue_size", "rotation_policy"] {
            let field = file_access.field(name).unwrap();
            assert_eq!(field.presence, Presence::OptionalComputed, "{}", name);
        }
    }

    #[test]
    fn test_lookup() {
        let adapter = lookup("pingdirectory_file_based_access_log_publisher").unwrap();
        assert_eq!(adapter.lifecycle(), Lifecycle::Managed);
        assert_eq!(adapter.kind().urn_suffix, "file-based-access");

        let adapter = lookup("pingdirectory_default_file_based_access_log_publisher").unwrap();
        assert_eq!(adapter.lifecycle(), Lifecycle::EditOnly);
        assert_eq!(
            adapter.type_name(),
            "pingdirectory_default_file_based_access_log_publisher"
        );

        assert!(lookup("pingdirectory_widget").is_none());
        assert!(lookup("file_based_access_log_publisher").is_none());
    }

    #[test]
    fn test_urn() {
        let kind = lookup("pingdirectory_syslog_json_audit_log_publisher")
            .unwrap()
            .kind();
        assert_eq!(
            kind.urn(),
            "urn:pingidentity:schemas:configuration:2.0:log-publisher:syslog-json-audit"
        );
    }
}
