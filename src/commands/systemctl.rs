//! Simulated `systemctl` over a fixed service roster.
//!
//! `systemctl start NetworkManager` is the way out of rescue mode: while rescue mode is active
//! the service is reported as failed, and starting it resolves the emergency.

use crate::commands::{CommandError, CommandResult};
use crate::runtime::rescue::RescueControl;

pub const NETWORK_MANAGER: &str = "NetworkManager";

pub const SERVICE_NAMES: [&str; 6] = [
    NETWORK_MANAGER,
    "neural-matrix",
    "ice-firewall",
    "cyberdeck-sync",
    "holo-display",
    "data-vault",
];

pub const SUBCOMMANDS: [&str; 6] = ["status", "start", "stop", "restart", "enable", "disable"];

const UNIT_DIR: &str = "/etc/systemd/system";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Active,
    Inactive,
    Failed,
}

impl ServiceState {
    fn describe(self) -> &'static str {
        match self {
            Self::Active => "active (running)",
            Self::Inactive => "inactive (dead)",
            Self::Failed => "failed (Result: exit-code)",
        }
    }

    fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::Active => ("active", "running"),
            Self::Inactive => ("inactive", "dead"),
            Self::Failed => ("failed", "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    pub description: &'static str,
    pub state: ServiceState,
    pub enabled: bool,
}

impl Service {
    fn unit(&self) -> String {
        format!("{}.service", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTable {
    services: Vec<Service>,
}

impl Default for ServiceTable {
    fn default() -> Self {
        let descriptions = [
            "Network Manager",
            "Neural Matrix Interface",
            "Intrusion Countermeasures Electronics",
            "Cyberdeck Synchronization Daemon",
            "Holographic Display Server",
            "Encrypted Data Vault",
        ];
        let services = SERVICE_NAMES
            .into_iter()
            .zip(descriptions)
            .map(|(name, description)| Service {
                name,
                description,
                state: ServiceState::Active,
                enabled: true,
            })
            .collect();
        Self { services }
    }
}

impl ServiceTable {
    /// Looks a service up by name, with or without the `.service` suffix.
    pub fn get(&self, name: &str) -> Option<&Service> {
        let name = name.strip_suffix(".service").unwrap_or(name);
        self.services.iter().find(|service| service.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Service> {
        let name = name.strip_suffix(".service").unwrap_or(name);
        self.services.iter_mut().find(|service| service.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    /// Names of services that are not running.
    pub fn degraded(&self) -> Vec<&'static str> {
        self.services
            .iter()
            .filter(|service| service.state != ServiceState::Active)
            .map(|service| service.name)
            .collect()
    }

    /// Marks NetworkManager failed while rescue mode is active.
    pub fn sync_rescue(&mut self, rescue_active: bool) {
        if let Some(network) = self.get_mut(NETWORK_MANAGER) {
            if rescue_active && network.state == ServiceState::Active {
                network.state = ServiceState::Failed;
            }
        }
    }
}

pub fn run(
    args: &str,
    services: &mut ServiceTable,
    rescue: &mut dyn RescueControl,
) -> Result<CommandResult, CommandError> {
    services.sync_rescue(rescue.is_active());

    let mut words = args.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(CommandResult::output(list_units(services)));
    };
    let unit_arg = words.next();

    let text = match verb {
        "status" => match unit_arg {
            None => list_units(services),
            Some(name) => match services.get(name) {
                Some(service) => status(service),
                None => format!("Unit {} could not be found.", unit_name(name)),
            },
        },
        "start" | "stop" | "restart" | "enable" | "disable" => {
            let Some(name) = unit_arg else {
                return Ok(CommandResult::output("Too few arguments."));
            };
            change(verb, name, services, rescue)
        }
        other => format!("Unknown command verb '{other}'."),
    };
    Ok(CommandResult::output(text))
}

fn unit_name(name: &str) -> String {
    if name.ends_with(".service") {
        name.to_string()
    } else {
        format!("{name}.service")
    }
}

fn change(
    verb: &str,
    name: &str,
    services: &mut ServiceTable,
    rescue: &mut dyn RescueControl,
) -> String {
    let unit = unit_name(name);
    let Some(service) = services.get_mut(name) else {
        return match verb {
            "enable" | "disable" => {
                format!("Failed to {verb} unit: Unit file {unit} does not exist.")
            }
            _ => format!("Failed to {verb} {unit}: Unit {unit} not found."),
        };
    };

    match verb {
        "start" | "restart" => {
            let was = service.state;
            service.state = ServiceState::Active;
            if service.name == NETWORK_MANAGER && rescue.is_active() {
                rescue.resolve();
                tracing::info!("network restored, rescue mode resolved");
                return format!(
                    "Starting {unit}...\nNetwork connectivity restored.\nRescue mode deactivated. All systems nominal."
                );
            }
            tracing::debug!(service = service.name, ?was, verb, "service state changed");
            if verb == "start" {
                format!("Started {}.", service.description)
            } else {
                format!("Restarted {}.", service.description)
            }
        }
        "stop" => {
            service.state = ServiceState::Inactive;
            format!("Stopped {}.", service.description)
        }
        "enable" => {
            if service.enabled {
                return format!("{unit} is already enabled.");
            }
            service.enabled = true;
            format!(
                "Created symlink {UNIT_DIR}/multi-user.target.wants/{unit} \u{2192} {UNIT_DIR}/{unit}."
            )
        }
        _ => {
            if !service.enabled {
                return format!("{unit} is already disabled.");
            }
            service.enabled = false;
            format!("Removed \"{UNIT_DIR}/multi-user.target.wants/{unit}\".")
        }
    }
}

fn status(service: &Service) -> String {
    let unit = service.unit();
    let enabled = if service.enabled { "enabled" } else { "disabled" };
    format!(
        "\u{25cf} {unit} - {}\n     Loaded: loaded ({UNIT_DIR}/{unit}; {enabled}; preset: enabled)\n     Active: {}",
        service.description,
        service.state.describe()
    )
}

fn list_units(services: &ServiceTable) -> String {
    let width = services
        .iter()
        .map(|service| service.unit().len())
        .max()
        .unwrap_or(0)
        .max("UNIT".len());
    let mut lines = vec![format!(
        "{:<width$} LOAD   ACTIVE   SUB      DESCRIPTION",
        "UNIT"
    )];
    for service in services.iter() {
        let (active, sub) = service.state.columns();
        lines.push(format!(
            "{:<width$} loaded {active:<8} {sub:<8} {}",
            service.unit(),
            service.description
        ));
    }
    lines.push(String::new());
    lines.push(format!("{} loaded units listed.", services.services.len()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::rescue::RescueMode;
    use time::macros::datetime;

    fn systemctl(args: &str, services: &mut ServiceTable, rescue: &mut RescueMode) -> String {
        run(args, services, rescue)
            .expect("systemctl never fails hard")
            .text()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn status_of_one_service() {
        let mut services = ServiceTable::default();
        let text = systemctl("status neural-matrix", &mut services, &mut RescueMode::new());
        assert!(text.starts_with("\u{25cf} neural-matrix.service - Neural Matrix Interface"));
        assert!(text.ends_with("Active: active (running)"));
    }

    #[test]
    fn listing_has_every_unit() {
        let mut services = ServiceTable::default();
        let text = systemctl("", &mut services, &mut RescueMode::new());
        for name in SERVICE_NAMES {
            assert!(text.contains(&format!("{name}.service")), "missing {name}");
        }
        assert!(text.ends_with("6 loaded units listed."));
    }

    #[test]
    fn unknown_units_and_verbs() {
        let mut services = ServiceTable::default();
        let mut rescue = RescueMode::new();
        assert_eq!(
            systemctl("status sshd", &mut services, &mut rescue),
            "Unit sshd.service could not be found."
        );
        assert_eq!(
            systemctl("start sshd", &mut services, &mut rescue),
            "Failed to start sshd.service: Unit sshd.service not found."
        );
        assert_eq!(
            systemctl("frob x", &mut services, &mut rescue),
            "Unknown command verb 'frob'."
        );
        assert_eq!(systemctl("stop", &mut services, &mut rescue), "Too few arguments.");
    }

    #[test]
    fn stop_then_start_round_trip() {
        let mut services = ServiceTable::default();
        let mut rescue = RescueMode::new();
        systemctl("stop holo-display", &mut services, &mut rescue);
        assert_eq!(services.degraded(), vec!["holo-display"]);
        assert_eq!(
            systemctl("start holo-display.service", &mut services, &mut rescue),
            "Started Holographic Display Server."
        );
        assert!(services.degraded().is_empty());
    }

    #[test]
    fn enable_and_disable_messages() {
        let mut services = ServiceTable::default();
        let mut rescue = RescueMode::new();
        assert_eq!(
            systemctl("disable data-vault", &mut services, &mut rescue),
            "Removed \"/etc/systemd/system/multi-user.target.wants/data-vault.service\"."
        );
        assert!(systemctl("enable data-vault", &mut services, &mut rescue).starts_with("Created symlink"));
        assert_eq!(
            systemctl("enable data-vault", &mut services, &mut rescue),
            "data-vault.service is already enabled."
        );
    }

    #[test]
    fn starting_network_manager_resolves_rescue() {
        let mut services = ServiceTable::default();
        let mut rescue = RescueMode::new();
        rescue.activate(datetime!(2077-11-17 03:00 UTC));

        let text = systemctl("status NetworkManager", &mut services, &mut rescue);
        assert!(text.ends_with("failed (Result: exit-code)"));

        let text = systemctl("start NetworkManager", &mut services, &mut rescue);
        assert!(text.contains("Rescue mode deactivated"));
        assert!(!rescue.is_active());
        assert!(services.degraded().is_empty());
    }
}
