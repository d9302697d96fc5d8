pub mod categories;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod types;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::violations::requests::{
    CatalogListParams, CreateViolationCategoryRequest, CreateViolationRequest,
    CreateViolationTypeRequest, UpdateViolationCategoryRequest, UpdateViolationRequest,
    UpdateViolationTypeRequest, ViolationListParams,
};
use crate::storage::Storage;

/// 代码统一去空白并转大写，如 " pasal_1 " -> "PASAL_1"
pub(super) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub(super) fn check_points(points: i32) -> Result<(), String> {
    if points < 0 {
        return Err("Poin tidak boleh negatif".to_string());
    }
    Ok(())
}

pub struct ViolationService {
    storage: Option<Arc<dyn Storage>>,
}

impl ViolationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 违规类别
    pub async fn list_categories(
        &self,
        params: CatalogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        categories::list_categories(self, params, request).await
    }

    pub async fn create_category(
        &self,
        req: CreateViolationCategoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        categories::create_category(self, req, request).await
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        update: UpdateViolationCategoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        categories::update_category(self, category_id, update, request).await
    }

    pub async fn delete_category(
        &self,
        category_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        categories::delete_category(self, category_id, request).await
    }

    // 违规条目
    pub async fn list_violations(
        &self,
        params: ViolationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_violations(self, params, request).await
    }

    pub async fn get_violation(
        &self,
        violation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_violation(self, violation_id, request).await
    }

    pub async fn create_violation(
        &self,
        req: CreateViolationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_violation(self, req, request).await
    }

    pub async fn update_violation(
        &self,
        violation_id: i64,
        update: UpdateViolationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_violation(self, violation_id, update, request).await
    }

    pub async fn delete_violation(
        &self,
        violation_id: i64,
        force: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_violation(self, violation_id, force, request).await
    }

    // 旧版违规类型
    pub async fn list_violation_types(
        &self,
        params: CatalogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        types::list_violation_types(self, params, request).await
    }

    pub async fn create_violation_type(
        &self,
        req: CreateViolationTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        types::create_violation_type(self, req, request).await
    }

    pub async fn update_violation_type(
        &self,
        type_id: i64,
        update: UpdateViolationTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        types::update_violation_type(self, type_id, update, request).await
    }

    pub async fn delete_violation_type(
        &self,
        type_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        types::delete_violation_type(self, type_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" pasal_1 "), "PASAL_1");
        assert_eq!(normalize_code("1.a"), "1.A");
    }

    #[test]
    fn test_check_points() {
        assert!(check_points(0).is_ok());
        assert!(check_points(25).is_ok());
        assert!(check_points(-1).is_err());
    }
}
