use serde::{Deserialize, Serialize};

use crate::address::AddressRef;
use crate::quote::quoted;
use crate::service::ServiceRef;

/// Fixed fields written into every policy block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyDefaults {
    pub srcintf: String,
    pub dstintf: String,
    pub schedule: String,
    pub action: String,
    pub logtraffic: String,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            srcintf: "any".to_string(),
            dstintf: "any".to_string(),
            schedule: "always".to_string(),
            action: "accept".to_string(),
            logtraffic: "all".to_string(),
        }
    }
}

/// One compiled policy, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRecord {
    pub id: usize,
    pub name: String,
    pub source: AddressRef,
    pub destination: AddressRef,
    pub services: Vec<ServiceRef>,
}

impl PolicyRecord {
    /// Service names in the order they appear in the policy.
    pub fn service_names(&self) -> Vec<String> {
        self.services.iter().map(ServiceRef::reference).collect()
    }

    /// Policy block. Quoted values are escaped, so names may contain `"` or `\`.
    pub fn render(&self, defaults: &PolicyDefaults) -> String {
        let service_list = self
            .service_names()
            .iter()
            .map(|s| quoted(s))
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = String::new();
        out.push_str("config firewall policy\n");
        out.push_str(&format!("    edit {}\n", self.id));
        out.push_str(&format!("        set name {}\n", quoted(&self.name)));
        out.push_str(&format!("        set srcintf {}\n", quoted(&defaults.srcintf)));
        out.push_str(&format!("        set dstintf {}\n", quoted(&defaults.dstintf)));
        out.push_str(&format!(
            "        set srcaddr {}\n",
            quoted(self.source.reference())
        ));
        out.push_str(&format!(
            "        set dstaddr {}\n",
            quoted(self.destination.reference())
        ));
        out.push_str(&format!("        set service {service_list}\n"));
        out.push_str(&format!("        set schedule {}\n", quoted(&defaults.schedule)));
        out.push_str(&format!("        set action {}\n", defaults.action));
        out.push_str(&format!("        set logtraffic {}\n", defaults.logtraffic));
        out.push_str("    next\nend\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{PolicyDefaults, PolicyRecord};
    use crate::address::AddressRef;
use crate::quote::quoted;
    use crate::service::ServiceRef;

    #[test]
    fn renders_policy_block_with_defaults() {
        let record = PolicyRecord {
            id: 7,
            name: "AllowWeb".to_string(),
            source: AddressRef::classify("WebSrv"),
            destination: AddressRef::classify("any"),
            services: vec![ServiceRef::parse("TCP/443"), ServiceRef::parse("ssl-vpn")],
        };

        let expected = "\
config firewall policy
    edit 7
        set name \"AllowWeb\"
        set srcintf \"any\"
        set dstintf \"any\"
        set srcaddr \"WebSrv\"
        set dstaddr \"any\"
        set service \"TCP-443\" \"ssl-vpn\"
        set schedule \"always\"
        set action accept
        set logtraffic all
    next
end
";
        assert_eq!(record.render(&PolicyDefaults::default()), expected);
    }

    #[test]
    fn overridden_defaults_flow_into_block() {
        let record = PolicyRecord {
            id: 1,
            name: "DenyAll".to_string(),
            source: AddressRef::classify("any"),
            destination: AddressRef::classify("any"),
            services: vec![ServiceRef::parse("ALL")],
        };
        let defaults = PolicyDefaults {
            srcintf: "port1".to_string(),
            action: "deny".to_string(),
            ..PolicyDefaults::default()
        };

        let block = record.render(&defaults);
        assert!(block.contains("        set srcintf \"port1\"\n"));
        assert!(block.contains("        set dstintf \"any\"\n"));
        assert!(block.contains("        set action deny\n"));
    }

    #[test]
    fn quotes_inside_names_are_escaped() {
        let record = PolicyRecord {
            id: 3,
            name: "Allow \"x\"".to_string(),
            source: AddressRef::classify("Web \"DMZ\""),
            destination: AddressRef::classify("any"),
            services: vec![ServiceRef::parse("my \"svc\"")],
        };

        let block = record.render(&PolicyDefaults::default());
        assert!(block.contains("        set name \"Allow \\\"x\\\"\"\n"));
        assert!(block.contains("        set srcaddr \"Web \\\"DMZ\\\"\"\n"));
        assert!(block.contains("        set service \"my \\\"svc\\\"\"\n"));
    }
}
