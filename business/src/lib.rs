pub mod application {
    pub mod order {
        pub mod get_all;
        pub mod get_by_id;
        pub mod place;
        pub mod update_status;
    }
    pub mod product {
        pub mod get_by_id;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod unit_of_work;
    pub mod inventory {
        pub mod store;
    }
    pub mod order {
        pub mod access;
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod value_objects;
        pub mod use_cases {
            pub mod get_all;
            pub mod get_by_id;
            pub mod place;
            pub mod update_status;
        }
    }
    pub mod product {
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod use_cases {
            pub mod get_by_id;
        }
    }
    pub mod shared {
        pub mod pagination;
        pub mod value_objects;
    }
}
