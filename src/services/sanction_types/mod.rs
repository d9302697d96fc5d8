pub mod crud;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::sanction_types::requests::{
    CreateSanctionTypeRequest, UpdateSanctionTypeRequest,
};
use crate::models::violations::requests::CatalogListParams;
use crate::storage::Storage;

pub struct SanctionTypeService {
    storage: Option<Arc<dyn Storage>>,
}

impl SanctionTypeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_sanction_types(
        &self,
        params: CatalogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::list_sanction_types(self, params, request).await
    }

    pub async fn create_sanction_type(
        &self,
        req: CreateSanctionTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_sanction_type(self, req, request).await
    }

    pub async fn update_sanction_type(
        &self,
        sanction_type_id: i64,
        update: UpdateSanctionTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_sanction_type(self, sanction_type_id, update, request).await
    }

    // 被案件引用时默认停用，force 时级联删除
    pub async fn delete_sanction_type(
        &self,
        sanction_type_id: i64,
        force: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::delete_sanction_type(self, sanction_type_id, force, request).await
    }
}
