//! Cisco ASA: two syslog headers and two message grammars.
//!
//! Headers:
//! - `0033`: `Oct 21 2021 10:15:42 10.0.0.1: %ASA-6-113019: ...`
//! - `0034`: `Oct 21 10:15:42 fw-edge-01 %ASA-4-106023: ...` (no year)
//!
//! Messages:
//! - `113019`: VPN session teardown with duration, byte counts and URL
//! - `106023`: ACL deny, TCP/UDP with ports or ICMP with type/code

use std::sync::Arc;

use crate::conf::ParserConfig;
use crate::device::DeviceProcessor;
use crate::error::RuleError;
use crate::expr::{Function, LookupTable, UrlComponent};
use crate::normalize::{Converter, MappingEntry, MappingTable};
use crate::runtime::vocab::*;
use crate::runtime::Node;

pub const DEVICE_NAME: &str = "cisco_asa";

/// Build the processor with this device's tree and mappings.
pub fn processor(config: &ParserConfig) -> Result<DeviceProcessor, RuleError> {
    DeviceProcessor::new(DEVICE_NAME, rule_tree()?, mapping_table(), config)
}

pub fn rule_tree() -> Result<Node, RuleError> {
    let headers = linear_select(vec![header_0033()?, header_0034()?]);

    let messages = msgid_select([("113019", msg_113019()?), ("106023", msg_106023()?)]);

    Ok(chain(vec![
        headers,
        messages,
        set_field("@timestamp", field("event_time")),
    ]))
}

fn header_0033() -> Result<Node, RuleError> {
    match_(
        "HEADER#0:0033",
        "message",
        "%{month->} %{day->} %{year->} %{hhour}:%{hmin}:%{hsec->} %{hostip}: %ASA-%{level}-%{messageid}: %{payload}",
        Some(chain(vec![
            setc("header_id", "0033"),
            date_time(
                "event_time",
                &["month", "day", "year", "hhour", "hmin", "hsec"],
                "%B %F %W %N %U %O",
            )?,
            severity(),
            remove(&["month", "day", "year", "hhour", "hmin", "hsec"]),
        ])),
    )
}

fn header_0034() -> Result<Node, RuleError> {
    match_(
        "HEADER#1:0034",
        "message",
        "%{month->} %{day->} %{hhour}:%{hmin}:%{hsec->} %{hostname} %ASA-%{level}-%{messageid}: %{payload}",
        Some(chain(vec![
            setc("header_id", "0034"),
            date_time("event_time", &["month", "day", "hhour", "hmin", "hsec"], "%B %F %N %U %O")?,
            severity(),
            remove(&["month", "day", "hhour", "hmin", "hsec"]),
        ])),
    )
}

fn severity() -> Node {
    let table = Arc::new(
        LookupTable::new()
            .entry("0", "emergency")
            .entry("1", "alert")
            .entry("2", "critical")
            .entry("3", "error")
            .entry("4", "warning")
            .entry("5", "notice")
            .entry("6", "informational")
            .entry("7", "debug")
            .with_default("unknown"),
    );
    lookup("nwparser.severity", field("level"), &table)
}

fn msg_113019() -> Result<Node, RuleError> {
    match_(
        "MESSAGE#0:113019",
        "nwparser.payload",
        "Duration: %{hour}h:%{min}m:%{second}s, Bytes xmt: %{sbytes}, Bytes rcv: %{rbytes}, Reason: %{result->} %{d2}, URL: %{url}",
        Some(chain(vec![
            setc("eventcategory", "1801030100"),
            call(
                "nwparser.bytes",
                Function::Calc,
                vec![field("sbytes"), constant("+"), field("rbytes")],
            ),
            duration("duration", &["hour", "min", "second"], &["%N%U%O"])?,
            duration("d2", &["d2"], &["%N:%U:%O"])?,
            url_extract(UrlComponent::Page, "page", "url"),
            url_extract(UrlComponent::Domain, "domain", "url"),
            remove(&["hour", "min", "second"]),
        ])),
    )
}

fn msg_106023() -> Result<Node, RuleError> {
    let with_ports = match_(
        "MESSAGE#1:106023",
        "nwparser.payload",
        "Deny %{protocol} src %{sinterface}:%{saddr}/%{sport} dst %{dinterface}:%{daddr}/%{dport} by access-group %{listnum} %{fld1}",
        None,
    )?;
    let icmp = match_(
        "MESSAGE#2:106023:01",
        "nwparser.payload",
        "Deny icmp src %{sinterface}:%{saddr} dst %{dinterface}:%{daddr} (type %{icmptype}, code %{icmpcode}) by access-group %{listnum} %{fld1}",
        Some(setc("protocol", "icmp")),
    )?;

    let src_dir_name = Arc::new(
        LookupTable::new()
            .entry("0", "INSIDE")
            .entry("1", "OUTSIDE"),
    );

    Ok(all_match(
        vec![linear_select(vec![with_ports, icmp])],
        Some(chain(vec![
            setc("eventcategory", "1801030000"),
            setc("action", "DENY"),
            set_field("nwparser.listnum", rmq(field("listnum"))),
            set_field("nwparser.direction", dirchk(field("saddr"))),
            lookup("nwparser.srcdirname", field("direction"), &src_dir_name),
            set_field(
                "nwparser.event_description",
                strcat(vec![
                    constant("denied "),
                    field("protocol"),
                    constant(" by "),
                    field("listnum"),
                ]),
            ),
            remove(&["fld1"]),
        ])),
        None,
    ))
}

pub fn mapping_table() -> MappingTable {
    MappingTable::new()
        // header
        .with("header_id", MappingEntry::new().rsa("rsa.internal.header_id"))
        .with(
            "messageid",
            MappingEntry::new().ecs("event.code").rsa("rsa.internal.messageid"),
        )
        .with("payload", MappingEntry::new())
        .with(
            "level",
            MappingEntry::new()
                .convert(Converter::Long)
                .ecs("log.syslog.severity.code")
                .rsa("rsa.misc.severity"),
        )
        .with("severity", MappingEntry::new().ecs("log.level"))
        .with(
            "hostip",
            MappingEntry::new()
                .convert(Converter::Ip)
                .ecs("host.ip")
                .rsa("rsa.network.host_ip"),
        )
        .with(
            "hostname",
            MappingEntry::new().ecs("host.name").rsa("rsa.network.alias_host"),
        )
        .with(
            "event_time",
            MappingEntry::new().convert(Converter::Date).rsa("rsa.time.event_time"),
        )
        .with(
            "eventcategory",
            MappingEntry::new()
                .convert(Converter::Long)
                .rsa("rsa.investigations.event_cat"),
        )
        // 113019
        .with(
            "sbytes",
            MappingEntry::new()
                .convert(Converter::Long)
                .ecs("source.bytes")
                .rsa("rsa.internal.sbytes"),
        )
        .with(
            "rbytes",
            MappingEntry::new()
                .convert(Converter::Long)
                .ecs("destination.bytes")
                .rsa("rsa.internal.rbytes"),
        )
        .with(
            "bytes",
            MappingEntry::new()
                .convert(Converter::Long)
                .ecs("network.bytes")
                .rsa("rsa.internal.bytes"),
        )
        .with(
            "duration",
            MappingEntry::new()
                .convert(Converter::Long)
                .rsa("rsa.time.duration_time"),
        )
        .with("d2", MappingEntry::new().convert(Converter::Long).rsa("rsa.time.d2"))
        .with(
            "result",
            MappingEntry::new().ecs("event.reason").rsa("rsa.misc.result"),
        )
        .with("url", MappingEntry::new().ecs("url.original").rsa("rsa.web.url"))
        .with("page", MappingEntry::new().rsa("rsa.web.web_page"))
        .with(
            "domain",
            MappingEntry::new().ecs("url.registered_domain").rsa("rsa.web.domain"),
        )
        // 106023
        .with(
            "protocol",
            MappingEntry::new()
                .convert(Converter::Lowercase)
                .ecs("network.transport")
                .rsa("rsa.network.protocol"),
        )
        .with(
            "sinterface",
            MappingEntry::new()
                .ecs("observer.ingress.interface.name")
                .rsa("rsa.network.sinterface"),
        )
        .with(
            "dinterface",
            MappingEntry::new()
                .ecs("observer.egress.interface.name")
                .rsa("rsa.network.dinterface"),
        )
        .with(
            "saddr",
            MappingEntry::new()
                .convert(Converter::Ip)
                .ecs("source.ip")
                .rsa("rsa.network.saddr"),
        )
        .with(
            "daddr",
            MappingEntry::new()
                .convert(Converter::Ip)
                .ecs("destination.ip")
                .rsa("rsa.network.daddr"),
        )
        .with(
            "sport",
            MappingEntry::new()
                .convert(Converter::Long)
                .ecs("source.port")
                .rsa("rsa.network.sport"),
        )
        .with(
            "dport",
            MappingEntry::new()
                .convert(Converter::Long)
                .ecs("destination.port")
                .rsa("rsa.network.dport"),
        )
        .with(
            "icmptype",
            MappingEntry::new().convert(Converter::Long).rsa("rsa.network.icmptype"),
        )
        .with(
            "icmpcode",
            MappingEntry::new().convert(Converter::Long).rsa("rsa.network.icmpcode"),
        )
        .with("listnum", MappingEntry::new().ecs("rule.name").rsa("rsa.misc.listnum"))
        .with(
            "action",
            MappingEntry::new()
                .convert(Converter::Lowercase)
                .ecs("event.action")
                .rsa("rsa.misc.action"),
        )
        .with("direction", MappingEntry::new().rsa("rsa.misc.direction"))
        .with("srcdirname", MappingEntry::new().rsa("rsa.network.zone_src"))
        .with(
            "event_description",
            MappingEntry::new().rsa("rsa.internal.event_desc"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventStore, Value};
    use crate::runtime::{Context, RuntimeOptions};
    use chrono::{TimeZone, Utc};

    const VPN_LINE: &str = "Oct 21 2021 10:15:42 10.0.0.1: %ASA-6-113019: Duration: 0h:35m:12s, Bytes xmt: 1234, Bytes rcv: 5678, Reason: Idle 00:01:02, URL: https://www.example.com/portal/index.html?user=1";
    const DENY_LINE: &str = "Oct 21 10:15:42 fw-edge-01 %ASA-4-106023: Deny tcp src outside:10.0.0.5/5555 dst inside:192.168.1.10/80 by access-group \"acl_out\" [0x0, 0x0]";
    const ICMP_LINE: &str = "Oct 21 10:15:42 fw-edge-01 %ASA-4-106023: Deny icmp src outside:10.0.0.5 dst inside:192.168.1.10 (type 8, code 0) by access-group \"acl_out\" [0x0, 0x0]";

    fn run(line: &str) -> (Event, bool) {
        let tree = rule_tree().unwrap();
        let options = RuntimeOptions::default();
        let mut event = Event::from_message(line);
        let failed = {
            let now = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
            let mut ctx = Context::new(&mut event, &options).with_clock(now);
            tree.run(&mut ctx);
            ctx.failed()
        };
        (event, !failed)
    }

    #[test]
    fn test_rule_tree_builds() {
        assert!(rule_tree().is_ok());
        assert!(!mapping_table().is_empty());
    }

    #[test]
    fn test_vpn_teardown_captures() {
        let (event, matched) = run(VPN_LINE);
        assert!(matched);
        assert_eq!(event.get_str("nwparser.header_id"), Some("0033"));
        assert_eq!(event.get_str("nwparser.hostip"), Some("10.0.0.1"));
        assert_eq!(event.get_str("nwparser.messageid"), Some("113019"));
        assert_eq!(event.get_str("nwparser.severity"), Some("informational"));
        assert_eq!(event.get_str("nwparser.bytes"), Some("6912"));
        assert_eq!(event.get_str("nwparser.duration"), Some("2112"));
        assert_eq!(event.get_str("nwparser.d2"), Some("62"));
        assert_eq!(event.get_str("nwparser.result"), Some("Idle"));
        assert_eq!(event.get_str("nwparser.page"), Some("index.html"));
        assert_eq!(event.get_str("nwparser.domain"), Some("example.com"));
        assert!(event.get("nwparser.hour").is_none());
        assert!(event.get("nwparser.month").is_none());

        let expected = Utc.with_ymd_and_hms(2021, 10, 21, 10, 15, 42).unwrap();
        assert_eq!(event.get("@timestamp"), Some(&Value::Timestamp(expected)));
    }

    #[test]
    fn test_acl_deny_captures() {
        let (event, matched) = run(DENY_LINE);
        assert!(matched);
        assert_eq!(event.get_str("nwparser.header_id"), Some("0034"));
        assert_eq!(event.get_str("nwparser.hostname"), Some("fw-edge-01"));
        assert_eq!(event.get_str("nwparser.protocol"), Some("tcp"));
        assert_eq!(event.get_str("nwparser.saddr"), Some("10.0.0.5"));
        assert_eq!(event.get_str("nwparser.dport"), Some("80"));
        assert_eq!(event.get_str("nwparser.listnum"), Some("acl_out"));
        assert_eq!(event.get_str("nwparser.direction"), Some("1"));
        assert_eq!(event.get_str("nwparser.srcdirname"), Some("OUTSIDE"));
        assert_eq!(event.get_str("nwparser.event_description"), Some("denied tcp by acl_out"));
        assert!(event.get("nwparser.fld1").is_none());

        // Year comes from the clock.
        let expected = Utc.with_ymd_and_hms(2022, 10, 21, 10, 15, 42).unwrap();
        assert_eq!(event.get("@timestamp"), Some(&Value::Timestamp(expected)));
    }

    #[test]
    fn test_icmp_variant_selected() {
        let (event, matched) = run(ICMP_LINE);
        assert!(matched);
        assert_eq!(event.get_str("nwparser.protocol"), Some("icmp"));
        assert_eq!(event.get_str("nwparser.icmptype"), Some("8"));
        assert_eq!(event.get_str("nwparser.icmpcode"), Some("0"));
        assert!(event.get("nwparser.sport").is_none());
    }

    #[test]
    fn test_unknown_message_id_keeps_header() {
        let line = "Oct 21 10:15:42 fw-edge-01 %ASA-5-999999: something else";
        let (event, matched) = run(line);
        assert!(matched);
        assert_eq!(event.get_str("nwparser.messageid"), Some("999999"));
        assert_eq!(event.get_str("nwparser.severity"), Some("notice"));
    }

    #[test]
    fn test_known_id_bad_payload_fails() {
        let line = "Oct 21 10:15:42 fw-edge-01 %ASA-4-106023: Permit everything";
        let (event, matched) = run(line);
        assert!(!matched);
        assert_eq!(event.get_str("log.flags"), Some("dissect_parsing_error"));
        assert!(event.get("nwparser.action").is_none());
    }
}
