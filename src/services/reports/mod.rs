pub mod dashboard;
pub mod monthly;
pub mod saved;
pub mod statistics;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::reports::requests::{
    CreateReportRequest, MonthlyParams, ReportListParams, StatisticsParams,
};
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request).await
    }

    pub async fn get_statistics(
        &self,
        params: StatisticsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::get_statistics(self, params, request).await
    }

    pub async fn get_monthly_report(
        &self,
        params: MonthlyParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::get_monthly_report(self, params, request).await
    }

    pub async fn export_monthly_pdf(
        &self,
        params: MonthlyParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::export_monthly_pdf(self, params, request).await
    }

    /// 已保存的报表
    pub async fn list_reports(
        &self,
        params: ReportListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        saved::list_reports(self, params, request).await
    }

    pub async fn create_report(
        &self,
        req: CreateReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        saved::create_report(self, req, request).await
    }

    pub async fn get_report(
        &self,
        report_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        saved::get_report(self, report_id, request).await
    }

    pub async fn delete_report(
        &self,
        report_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        saved::delete_report(self, report_id, request).await
    }
}
