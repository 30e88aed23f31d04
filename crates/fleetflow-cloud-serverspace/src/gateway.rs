//! Network gateways with firewall and NAT rules

use crate::client::ServerspaceClient;
use crate::error::Result;
use crate::task::Task;
use fleetflow_cloud::{CloudError, TaskRef};
use serde::{Deserialize, Serialize};

const GATEWAY_BASE_URL: &str = "gateways";

/// Rule protocol. Casing on the wire varies between endpoints, so lowercase
/// spellings are accepted and anything else decodes as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleProtocol {
    #[serde(alias = "ip")]
    Ip,
    #[serde(alias = "tcp")]
    Tcp,
    #[serde(alias = "udp")]
    Udp,
    #[serde(alias = "icmp")]
    Icmp,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirewallAction {
    #[serde(alias = "allow", alias = "ALLOW")]
    Allow,
    #[serde(alias = "deny", alias = "DENY")]
    Deny,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirewallDirection {
    #[serde(alias = "in", alias = "IN")]
    In,
    #[serde(alias = "out", alias = "OUT")]
    Out,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NatRuleType {
    Snat,
    Dnat,
    Binat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<FirewallAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<FirewallDirection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RuleProtocol>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatRule {
    #[serde(rename = "type")]
    pub rule_type: NatRuleType,

    pub protocol: RuleProtocol,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_port: Option<u16>,
}

/// Gateway network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayNic {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub network_id: Option<String>,

    #[serde(default)]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: String,

    #[serde(default)]
    pub location_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub nics: Vec<GatewayNic>,

    #[serde(default)]
    pub network_ids: Vec<String>,

    #[serde(default)]
    pub nat_rules: Vec<NatRule>,

    #[serde(default)]
    pub firewall_rules: Vec<FirewallRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGatewayRequest {
    pub location_id: String,
    pub name: String,
    pub bandwidth_mbps: u32,
    pub network_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct BandwidthRequest {
    bandwidth_mbps: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct FirewallRules {
    #[serde(default)]
    firewall_rules: Vec<FirewallRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NatRules {
    #[serde(default)]
    nat_rules: Vec<NatRule>,
}

#[derive(Debug, Deserialize)]
struct GatewayWrap {
    gateway: Gateway,
}

#[derive(Debug, Deserialize)]
struct GatewayListWrap {
    #[serde(default)]
    gateways: Vec<Gateway>,
}

fn gateway_url(gateway_id: &str) -> String {
    format!("{}/{}", GATEWAY_BASE_URL, gateway_id)
}

impl ServerspaceClient {
    pub async fn get_gateway(&self, gateway_id: &str) -> Result<Gateway> {
        let wrap: GatewayWrap = self.get(&gateway_url(gateway_id)).await?;
        Ok(wrap.gateway)
    }

    pub async fn list_gateways(&self) -> Result<Vec<Gateway>> {
        let wrap: GatewayListWrap = self.get(GATEWAY_BASE_URL).await?;
        Ok(wrap.gateways)
    }

    pub async fn create_gateway(&self, request: &CreateGatewayRequest) -> Result<TaskRef> {
        self.post(GATEWAY_BASE_URL, request).await
    }

    pub async fn create_gateway_and_wait(&self, request: &CreateGatewayRequest) -> Result<Gateway> {
        let task = self.create_gateway(request).await?;
        self.wait_gateway(task).await
    }

    /// Rename a gateway. Takes effect without a task.
    pub async fn rename_gateway(&self, gateway_id: &str, name: &str) -> Result<()> {
        self.put_discard(&gateway_url(gateway_id), &RenameRequest { name })
            .await
    }

    pub async fn delete_gateway(&self, gateway_id: &str) -> Result<TaskRef> {
        self.delete(&gateway_url(gateway_id)).await
    }

    pub async fn delete_gateway_and_wait(&self, gateway_id: &str) -> Result<()> {
        let task = self.delete_gateway(gateway_id).await?;
        Ok(self.poller().wait_completed(self, task).await?)
    }

    pub async fn edit_gateway_bandwidth(
        &self,
        gateway_id: &str,
        bandwidth_mbps: u32,
    ) -> Result<TaskRef> {
        let url = format!("{}/bandwidth", gateway_url(gateway_id));
        self.put(&url, &BandwidthRequest { bandwidth_mbps }).await
    }

    pub async fn edit_gateway_bandwidth_and_wait(
        &self,
        gateway_id: &str,
        bandwidth_mbps: u32,
    ) -> Result<Gateway> {
        let task = self.edit_gateway_bandwidth(gateway_id, bandwidth_mbps).await?;
        self.wait_gateway(task).await
    }

    pub async fn get_firewall_rules(&self, gateway_id: &str) -> Result<Vec<FirewallRule>> {
        let url = format!("{}/firewall", gateway_url(gateway_id));
        let rules: FirewallRules = self.get(&url).await?;
        Ok(rules.firewall_rules)
    }

    /// Replace the gateway's firewall rule set
    pub async fn edit_firewall_rules(
        &self,
        gateway_id: &str,
        rules: Vec<FirewallRule>,
    ) -> Result<TaskRef> {
        let url = format!("{}/firewall", gateway_url(gateway_id));
        self.put(&url, &FirewallRules { firewall_rules: rules }).await
    }

    pub async fn edit_firewall_rules_and_wait(
        &self,
        gateway_id: &str,
        rules: Vec<FirewallRule>,
    ) -> Result<Gateway> {
        let task = self.edit_firewall_rules(gateway_id, rules).await?;
        self.wait_gateway(task).await
    }

    pub async fn get_nat_rules(&self, gateway_id: &str) -> Result<Vec<NatRule>> {
        let url = format!("{}/nat", gateway_url(gateway_id));
        let rules: NatRules = self.get(&url).await?;
        Ok(rules.nat_rules)
    }

    /// Replace the gateway's NAT rule set
    pub async fn edit_nat_rules(&self, gateway_id: &str, rules: Vec<NatRule>) -> Result<TaskRef> {
        let url = format!("{}/nat", gateway_url(gateway_id));
        self.put(&url, &NatRules { nat_rules: rules }).await
    }

    pub async fn edit_nat_rules_and_wait(
        &self,
        gateway_id: &str,
        rules: Vec<NatRule>,
    ) -> Result<Gateway> {
        let task = self.edit_nat_rules(gateway_id, rules).await?;
        self.wait_gateway(task).await
    }

    /// Wait for a gateway task and fetch the gateway it touched
    pub async fn wait_gateway(&self, task: TaskRef) -> Result<Gateway> {
        let gateway = self
            .poller()
            .resolve(self, task, Task::gateway_id, |id| async move {
                self.get_gateway(&id).await.map_err(CloudError::from)
            })
            .await?;
        Ok(gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_firewall_rule_wire_format() {
        let rule = FirewallRule {
            action: Some(FirewallAction::Allow),
            direction: Some(FirewallDirection::In),
            protocol: Some(RuleProtocol::Tcp),
            source: None,
            source_port: None,
            destination: Some("10.0.0.5".into()),
            destination_port: Some(443),
        };
        let body = FirewallRules {
            firewall_rules: vec![rule],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "firewall_rules": [{
                    "action": "Allow",
                    "direction": "In",
                    "protocol": "TCP",
                    "destination": "10.0.0.5",
                    "destination_port": 443
                }]
            })
        );
    }

    #[test]
    fn test_decode_gateway() {
        let wrap: GatewayWrap = serde_json::from_value(json!({
            "gateway": {
                "id": "gw1",
                "name": "edge",
                "location_id": "am2",
                "network_ids": ["n1", "n2"],
                "nat_rules": [
                    {"type": "DNAT", "protocol": "TCP", "destination_port": 80,
                     "translated": "192.168.0.10", "translated_port": 8080}
                ]
            }
        }))
        .unwrap();

        let gateway = wrap.gateway;
        assert_eq!(gateway.network_ids.len(), 2);
        assert_eq!(gateway.nat_rules[0].rule_type, NatRuleType::Dnat);
        assert_eq!(gateway.nat_rules[0].translated_port, Some(8080));
        assert!(gateway.firewall_rules.is_empty());
    }

    #[test]
    fn test_decode_loose_firewall_rules() {
        let rules: FirewallRules = serde_json::from_value(json!({
            "firewall_rules": [
                {"destination": "10.0.0.5"},
                {"action": "allow", "direction": "out", "protocol": "tcp"},
                {"action": "Reject", "direction": "In", "protocol": "GRE"}
            ]
        }))
        .unwrap();

        let rules = rules.firewall_rules;
        assert_eq!(rules[0].action, None);
        assert_eq!(rules[0].protocol, None);
        assert_eq!(rules[1].action, Some(FirewallAction::Allow));
        assert_eq!(rules[1].direction, Some(FirewallDirection::Out));
        assert_eq!(rules[1].protocol, Some(RuleProtocol::Tcp));
        assert_eq!(rules[2].action, Some(FirewallAction::Other));
        assert_eq!(rules[2].protocol, Some(RuleProtocol::Other));
    }
}
