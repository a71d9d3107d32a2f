//! Diesel schema for function configuration persistence.

diesel::table! {
    /// Function configuration records.
    function_configs (id) {
        /// Internal function identifier.
        id -> Uuid,
        /// Unique function name.
        #[max_length = 100]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// JSON-encoded input schema.
        input_schema -> Text,
        /// Implementation tag.
        #[max_length = 50]
        implementation_type -> Varchar,
        /// JSON-encoded implementation configuration.
        implementation_config -> Text,
        /// Whether the function can be executed.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
