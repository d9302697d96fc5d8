pub mod actions;
pub mod create;
pub mod get;
pub mod list;
pub mod pdf;
pub mod sanctions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::cases::requests::{
    CaseActionListParams, CaseListParams, CreateCaseActionRequest, CreateCaseRequest,
    UpdateCaseActionRequest, UpdateCaseRequest,
};
use crate::models::sanctions::requests::{CreateSanctionRequest, UpdateSanctionRequest};
use crate::storage::Storage;

pub struct CaseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CaseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_cases(
        &self,
        params: CaseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_cases(self, params, request).await
    }

    pub async fn create_case(
        &self,
        req: CreateCaseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_case(self, req, request).await
    }

    // 案件详情，含处理记录与处分
    pub async fn get_case(&self, case_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_case(self, case_id, request).await
    }

    pub async fn update_case(
        &self,
        case_id: i64,
        update: UpdateCaseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_case(self, case_id, update, request).await
    }

    pub async fn export_case_pdf(
        &self,
        case_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        pdf::export_case_pdf(self, case_id, request).await
    }

    /// 处理记录
    pub async fn list_actions(
        &self,
        case_id: i64,
        params: CaseActionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        actions::list_actions(self, case_id, params, request).await
    }

    pub async fn create_action(
        &self,
        case_id: i64,
        req: CreateCaseActionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        actions::create_action(self, case_id, req, request).await
    }

    pub async fn get_action(
        &self,
        case_id: i64,
        action_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        actions::get_action(self, case_id, action_id, request).await
    }

    pub async fn update_action(
        &self,
        case_id: i64,
        action_id: i64,
        update: UpdateCaseActionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        actions::update_action(self, case_id, action_id, update, request).await
    }

    pub async fn delete_action(
        &self,
        case_id: i64,
        action_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        actions::delete_action(self, case_id, action_id, request).await
    }

    /// 正式处分
    pub async fn list_sanctions(
        &self,
        case_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sanctions::list_sanctions(self, case_id, request).await
    }

    pub async fn create_sanction(
        &self,
        case_id: i64,
        req: CreateSanctionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sanctions::create_sanction(self, case_id, req, request).await
    }

    pub async fn update_sanction(
        &self,
        sanction_id: i64,
        update: UpdateSanctionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sanctions::update_sanction(self, sanction_id, update, request).await
    }

    pub async fn delete_sanction(
        &self,
        sanction_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sanctions::delete_sanction(self, sanction_id, request).await
    }
}
