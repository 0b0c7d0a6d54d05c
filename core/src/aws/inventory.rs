use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::{Filter, Instance};
use aws_sdk_elasticloadbalancing::types::LoadBalancerDescription;
use aws_sdk_elasticloadbalancingv2::types::LoadBalancer as ApplicationLoadBalancer;
use aws_sdk_rds::types::DbInstance;
use exposr_common::error::InventoryError;
use exposr_common::providers::InventoryProvider;
use exposr_common::resource::{
    ComputeInstance, LoadBalancer, LoadBalancerGeneration, ManagedDatabase, ResourceKind,
};
use tracing::{debug, info};

use super::{AwsClients, FailureClass, classify, describe};

/// Largest page the load balancer APIs accept.
const PAGE_SIZE: i32 = 400;

pub struct AwsInventory {
    clients: AwsClients,
}

impl AwsInventory {
    pub fn new(clients: AwsClients) -> Self {
        Self { clients }
    }

    async fn list_classic_load_balancers(&self) -> Result<Vec<LoadBalancer>, InventoryError> {
        let kind = ResourceKind::LegacyLoadBalancer;
        let mut balancers = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .clients
                .elb
                .describe_load_balancers()
                .page_size(PAGE_SIZE)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| to_inventory_error(kind, &err))?;

            balancers.extend(page.load_balancer_descriptions().iter().map(from_classic));

            match page.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(balancers)
    }

    async fn list_application_load_balancers(&self) -> Result<Vec<LoadBalancer>, InventoryError> {
        let kind = ResourceKind::ApplicationLoadBalancer;
        let mut balancers = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .clients
                .elbv2
                .describe_load_balancers()
                .page_size(PAGE_SIZE)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| to_inventory_error(kind, &err))?;

            balancers.extend(page.load_balancers().iter().map(from_application));

            match page.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(balancers)
    }
}

#[async_trait]
impl InventoryProvider for AwsInventory {
    async fn list_running_compute_instances(&self) -> Result<Vec<ComputeInstance>, InventoryError> {
        let kind = ResourceKind::ComputeInstance;
        let mut instances = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .clients
                .ec2
                .describe_instances()
                .filters(
                    Filter::builder()
                        .name("instance-state-name")
                        .values("running")
                        .build(),
                )
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|err| to_inventory_error(kind, &err))?;

            for reservation in page.reservations() {
                instances.extend(reservation.instances().iter().filter_map(from_instance));
            }

            match page.next_token() {
                Some(next) if !next.is_empty() => next_token = Some(next.to_string()),
                _ => break,
            }
        }

        info!(count = instances.len(), "Running instances with a public address");
        Ok(instances)
    }

    async fn list_load_balancers(
        &self,
        generation: LoadBalancerGeneration,
    ) -> Result<Vec<LoadBalancer>, InventoryError> {
        let balancers = match generation {
            LoadBalancerGeneration::Legacy => self.list_classic_load_balancers().await?,
            LoadBalancerGeneration::Application => self.list_application_load_balancers().await?,
        };
        info!(kind = %generation.kind(), count = balancers.len(), "Listed load balancers");
        Ok(balancers)
    }

    async fn list_database_instances(&self) -> Result<Vec<ManagedDatabase>, InventoryError> {
        let kind = ResourceKind::ManagedDatabase;
        let mut databases = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .clients
                .rds
                .describe_db_instances()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| to_inventory_error(kind, &err))?;

            databases.extend(page.db_instances().iter().map(from_db_instance));

            match page.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        info!(count = databases.len(), "Listed database instances");
        Ok(databases)
    }
}

fn to_inventory_error<E, R>(kind: ResourceKind, err: &SdkError<E, R>) -> InventoryError
where
    E: ProvideErrorMetadata + Error + 'static,
    R: Debug,
{
    let message = describe(err);
    match classify(err, &[]) {
        FailureClass::Transient => InventoryError::Transient { kind, message },
        FailureClass::NotFound | FailureClass::Other => InventoryError::Fetch { kind, message },
    }
}

/// `None` for instances without a public IPv4 address: they cannot be reached.
fn from_instance(instance: &Instance) -> Option<ComputeInstance> {
    let Some(public_ip) = instance.public_ip_address() else {
        debug!(instance = ?instance.instance_id(), "No public address");
        return None;
    };

    let tags = instance
        .tags()
        .iter()
        .filter_map(|tag| Some((tag.key()?, tag.value()?)));

    Some(ComputeInstance {
        name: ComputeInstance::name_from_tags(tags),
        instance_id: instance.instance_id().unwrap_or_default().to_string(),
        public_ip: Some(public_ip.to_string()),
        security_group_ids: instance
            .security_groups()
            .iter()
            .filter_map(|group| group.group_id())
            .map(str::to_string)
            .collect(),
    })
}

fn from_classic(lb: &LoadBalancerDescription) -> LoadBalancer {
    LoadBalancer {
        generation: LoadBalancerGeneration::Legacy,
        name: lb.load_balancer_name().unwrap_or_default().to_string(),
        dns_name: lb.dns_name().unwrap_or_default().to_string(),
        scheme: lb.scheme().unwrap_or_default().to_string(),
        security_group_ids: lb.security_groups().to_vec(),
    }
}

fn from_application(lb: &ApplicationLoadBalancer) -> LoadBalancer {
    LoadBalancer {
        generation: LoadBalancerGeneration::Application,
        name: lb.load_balancer_name().unwrap_or_default().to_string(),
        dns_name: lb.dns_name().unwrap_or_default().to_string(),
        scheme: lb.scheme().map(|scheme| scheme.as_str()).unwrap_or_default().to_string(),
        security_group_ids: lb.security_groups().to_vec(),
    }
}

fn from_db_instance(db: &DbInstance) -> ManagedDatabase {
    let endpoint = db.endpoint().and_then(|endpoint| {
        let address = endpoint.address()?;
        Some(match endpoint.port() {
            Some(port) => format!("{address}:{port}"),
            None => address.to_string(),
        })
    });

    ManagedDatabase {
        identifier: db.db_instance_identifier().unwrap_or_default().to_string(),
        endpoint,
        publicly_accessible: db.publicly_accessible().unwrap_or(false),
        security_group_ids: db
            .vpc_security_groups()
            .iter()
            .filter_map(|group| group.vpc_security_group_id())
            .map(str::to_string)
            .collect(),
    }
}
