use super::ApiClient;
use crate::domain::ClientError;
use crate::models::dashboard::DashboardStatsWire;
use crate::models::DashboardStats;

impl ApiClient {
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        let wire: DashboardStatsWire = self.get_json("/dashboard/summary").await?;
        Ok(wire.into())
    }
}
