//! Declarative flag surface for the agent configuration
//!
//! Every externally tunable setting is described once as a name, shape,
//! default and help text. The table is metadata for the configuration merge
//! pipeline; nothing here parses a command line. Defaults that mirror a
//! configuration field are drawn from a fresh default object so the table and
//! the defaults can never drift apart.

use crate::schema::Config;
use clap::{value_parser, Arg, ArgAction, Command};

/// Default value for a flag; the variant also encodes the expected shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
    Int(i64),
    List(Vec<String>),
}

/// A single externally tunable setting.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub name: &'static str,
    pub default: FlagValue,
    pub help: &'static str,
}

impl FlagSpec {
    fn bool(name: &'static str, default: bool, help: &'static str) -> Self {
        Self { name, default: FlagValue::Bool(default), help }
    }

    fn string(name: &'static str, default: impl Into<String>, help: &'static str) -> Self {
        Self { name, default: FlagValue::Str(default.into()), help }
    }

    fn int(name: &'static str, default: i64, help: &'static str) -> Self {
        Self { name, default: FlagValue::Int(default), help }
    }

    fn list(name: &'static str, default: Vec<String>, help: &'static str) -> Self {
        Self { name, default: FlagValue::List(default), help }
    }
}

/// Builds the flag-declaration table.
pub fn flag_set() -> Vec<FlagSpec> {
    let c = Config::default();

    vec![
        FlagSpec::bool("server", false, "start dkron server"),
        FlagSpec::string("node-name", c.node_name, "node name"),
        FlagSpec::string("bind-addr", c.bind_addr, "address to bind listeners to"),
        FlagSpec::string("advertise-addr", "", "address to advertise to other nodes"),
        FlagSpec::string("http-addr", c.http_addr, "HTTP address"),
        FlagSpec::string("discover", c.discover, "mDNS discovery name"),
        FlagSpec::string("backend", c.backend, "store backend"),
        FlagSpec::list("backend-machine", c.backend_machines, "store backend machines addresses"),
        FlagSpec::string("profile", c.profile, "timing profile to use (lan, wan, local)"),
        FlagSpec::list("join", Vec::new(), "address of agent to join on startup"),
        FlagSpec::list("tag", Vec::new(), "tag pair, specified as key=value"),
        FlagSpec::string("keyspace", c.keyspace, "key namespace to use"),
        FlagSpec::string("encrypt", "", "encryption key"),
        FlagSpec::string(
            "log-level",
            c.log_level,
            "Log level (debug, info, warn, error, fatal, panic), defaults to info",
        ),
        FlagSpec::int("rpc-port", i64::from(c.rpc_port), "RPC port"),
        FlagSpec::int("advertise-rpc-port", 0, "advertise RPC port"),
        // Notifications
        FlagSpec::string("mail-host", "", "notification mail server host"),
        FlagSpec::int("mail-port", i64::from(c.mail_port), "port to use for the mail server"),
        FlagSpec::string("mail-username", "", "username for the mail server"),
        FlagSpec::string("mail-password", "", "password of the mail server"),
        FlagSpec::string("mail-from", "", "notification emails from address"),
        FlagSpec::string("mail-payload", "", "notification mail payload"),
        FlagSpec::string(
            "mail-subject-prefix",
            c.mail_subject_prefix,
            "notification mail subject prefix",
        ),
        FlagSpec::string("webhook-url", "", "notification webhook url"),
        FlagSpec::string("webhook-payload", "", "notification webhook payload"),
        FlagSpec::list("webhook-header", Vec::new(), "notification webhook additional header"),
        FlagSpec::string("dog-statsd-addr", "", "DataDog Agent address"),
        FlagSpec::list("dog-statsd-tags", Vec::new(), "Datadog tags, specified as key:value"),
        FlagSpec::string("statsd-addr", "", "Statsd Address"),
    ]
}

/// Renders the flag table into a `clap` command for the CLI front end.
///
/// List flags accept both comma-separated values and repeated occurrences.
/// Empty string and empty list defaults are left undeclared; an absent flag
/// and a zero-value default merge to the same result. Turning the parsed
/// matches into a [`Config`] is the merge pipeline's job, not this crate's.
pub fn command() -> Command {
    let mut cmd = Command::new("agent").about("dkron agent configuration flags");

    for spec in flag_set() {
        let arg = Arg::new(spec.name).long(spec.name).help(spec.help);
        let arg = match spec.default {
            FlagValue::Bool(_) => arg.action(ArgAction::SetTrue),
            FlagValue::Str(default) => {
                let arg = arg.action(ArgAction::Set);
                if default.is_empty() {
                    arg
                } else {
                    arg.default_value(default)
                }
            }
            FlagValue::Int(default) => arg
                .action(ArgAction::Set)
                .value_parser(value_parser!(i64))
                .default_value(default.to_string()),
            FlagValue::List(defaults) => {
                let arg = arg.action(ArgAction::Append).value_delimiter(',');
                if defaults.is_empty() {
                    arg
                } else {
                    arg.default_values(defaults)
                }
            }
        };
        cmd = cmd.arg(arg);
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lookup(set: &[FlagSpec], name: &str) -> FlagValue {
        set.iter()
            .find(|s| s.name == name)
            .map(|s| s.default.clone())
            .unwrap_or_else(|| panic!("flag {name} not declared"))
    }

    #[test]
    fn test_flag_names_unique() {
        let set = flag_set();
        let names: HashSet<_> = set.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), set.len());
    }

    #[test]
    fn test_flag_defaults_match_default_config() {
        let c = Config::default();
        let set = flag_set();

        assert_eq!(lookup(&set, "server"), FlagValue::Bool(c.server));
        assert_eq!(lookup(&set, "node-name"), FlagValue::Str(c.node_name.clone()));
        assert_eq!(lookup(&set, "bind-addr"), FlagValue::Str(c.bind_addr.clone()));
        assert_eq!(lookup(&set, "advertise-addr"), FlagValue::Str(c.advertise_addr.clone()));
        assert_eq!(lookup(&set, "http-addr"), FlagValue::Str(c.http_addr.clone()));
        assert_eq!(lookup(&set, "discover"), FlagValue::Str(c.discover.clone()));
        assert_eq!(lookup(&set, "backend"), FlagValue::Str(c.backend.clone()));
        assert_eq!(lookup(&set, "backend-machine"), FlagValue::List(c.backend_machines.clone()));
        assert_eq!(lookup(&set, "profile"), FlagValue::Str(c.profile.clone()));
        assert_eq!(lookup(&set, "join"), FlagValue::List(c.start_join.clone()));
        assert_eq!(lookup(&set, "keyspace"), FlagValue::Str(c.keyspace.clone()));
        assert_eq!(lookup(&set, "encrypt"), FlagValue::Str(c.encrypt_key.clone()));
        assert_eq!(lookup(&set, "log-level"), FlagValue::Str(c.log_level.clone()));
        assert_eq!(lookup(&set, "rpc-port"), FlagValue::Int(i64::from(c.rpc_port)));
        assert_eq!(
            lookup(&set, "advertise-rpc-port"),
            FlagValue::Int(i64::from(c.advertise_rpc_port))
        );
        assert_eq!(lookup(&set, "mail-port"), FlagValue::Int(i64::from(c.mail_port)));
        assert_eq!(
            lookup(&set, "mail-subject-prefix"),
            FlagValue::Str(c.mail_subject_prefix.clone())
        );
        assert_eq!(lookup(&set, "webhook-header"), FlagValue::List(c.webhook_headers.clone()));
        assert_eq!(lookup(&set, "dog-statsd-tags"), FlagValue::List(c.dog_statsd_tags.clone()));
    }

    #[test]
    fn test_command_parses_flags() {
        let matches = command()
            .try_get_matches_from([
                "agent",
                "--server",
                "--node-name",
                "node1",
                "--tag",
                "role=web",
                "--tag",
                "dc=east",
                "--backend-machine",
                "10.0.0.1:2379,10.0.0.2:2379",
                "--rpc-port",
                "7000",
            ])
            .expect("flag parsing failed");

        assert!(matches.get_flag("server"));
        assert_eq!(matches.get_one::<String>("node-name").unwrap(), "node1");

        let tags: Vec<&str> = matches
            .get_many::<String>("tag")
            .unwrap()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(tags, ["role=web", "dc=east"]);

        let machines: Vec<&str> = matches
            .get_many::<String>("backend-machine")
            .unwrap()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(machines, ["10.0.0.1:2379", "10.0.0.2:2379"]);

        assert_eq!(*matches.get_one::<i64>("rpc-port").unwrap(), 7000);
    }

    #[test]
    fn test_command_applies_defaults() {
        let matches = command().try_get_matches_from(["agent"]).unwrap();

        assert!(!matches.get_flag("server"));
        assert_eq!(matches.get_one::<String>("bind-addr").unwrap(), "0.0.0.0:8946");
        assert_eq!(matches.get_one::<String>("keyspace").unwrap(), "dkron");
        assert_eq!(*matches.get_one::<i64>("advertise-rpc-port").unwrap(), 0);
    }
}
