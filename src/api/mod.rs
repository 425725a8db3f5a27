pub mod push;
pub mod store;

pub struct ApiUrls {
    pub store_service_url: String,
    pub push_service_url: String,
}

impl ApiUrls {
    pub fn init() -> Self {
        Self {
            store_service_url: Self::get_store_service_url(),
            push_service_url: Self::get_push_service_url(),
        }
    }

    pub fn get_store_service_url() -> String {
        std::env::var("STORE_SERVICE_URL")
            .unwrap_or("http://localhost:3000/store-service".to_string())
    }

    pub fn get_push_service_url() -> String {
        std::env::var("PUSH_SERVICE_URL")
            .unwrap_or("http://localhost:3000/push-service".to_string())
    }
}
