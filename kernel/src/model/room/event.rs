use crate::model::id::CompanyId;

pub struct CreateRoom {
    pub name: String,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub company_id: CompanyId,
}
