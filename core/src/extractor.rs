//! Normalizes a raw rule set into the ingress rules that admit public traffic.

use exposr_common::firewall::{IngressRule, MalformedSource, RuleSet};
use exposr_common::network::port::PortRange;
use exposr_common::network::range::AddressRange;
use tracing::{trace, warn};

/// Result of extracting one rule set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Public-sourced rules, in permission order then source order.
    pub rules: Vec<IngressRule>,
    /// Source ranges that failed to parse. They are never classified.
    pub malformed: Vec<MalformedSource>,
}

pub fn extract_public_ingress_rules(rule_set: &RuleSet) -> Extraction {
    let mut extraction = Extraction::default();

    for permission in &rule_set.ingress {
        let port_range = PortRange::from_bounds(permission.from_port, permission.to_port);

        for source in &permission.sources {
            let range = match source.cidr.parse::<AddressRange>() {
                Ok(range) => range,
                Err(error) => {
                    warn!(
                        rule_set = %rule_set.id,
                        name = ?rule_set.name,
                        %error,
                        "Skipping malformed source range"
                    );
                    extraction.malformed.push(MalformedSource {
                        rule_set_id: rule_set.id.clone(),
                        error,
                    });
                    continue;
                }
            };

            if !range.is_public() {
                trace!(rule_set = %rule_set.id, %range, "Private source range");
                continue;
            }

            extraction.rules.push(IngressRule {
                port_range,
                source: range,
                description: source.description.clone(),
                protocol: permission.protocol.clone(),
            });
        }
    }

    extraction
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
