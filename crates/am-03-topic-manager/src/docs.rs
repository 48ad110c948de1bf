//! Submitter-facing documentation and metadata.

pub const TOPIC_MANAGER_NAME: &str = "Advertisement Topic Manager";
pub const TOPIC_MANAGER_SHORT_DESCRIPTION: &str = "Topic manager for advertisement content";

pub const TOPIC_DOCUMENTATION: &str = r#"# Advertisement Topic Manager

Outputs are admitted to `tm_advertisement` when their locking script is a
PushDrop token whose first field is the advertisement protocol marker
`1AdDtKreEzbHYKFjmoBuduFmSXXUGZG`.

A token carries, in order:

1. the protocol marker
2. title
3. description
4. media reference (UHRP URL of the video)
5. expiry (RFC 3339 timestamp)
6. sponsor identity key (hex)
7. reward per correct answer, in satoshis
8. service URL of the campaign server

Admitted advertisements are indexed by the `ls_advertisement` lookup service
and remain queryable until their expiry.
"#;
