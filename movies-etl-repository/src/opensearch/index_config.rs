//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the movie index.

use serde_json::{json, Value};

/// Get the index settings and mappings for the movie index.
///
/// The configuration includes:
/// - **Date fields** parsed with the same fixed formats the documents carry
/// - **Text fields** for title and description with a keyword sub-field on title
/// - **Keyword fields** for the id, category and the people/genre lists
pub fn movies_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "id": { "type": "keyword" },
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": { "type": "keyword" }
                    }
                },
                "description": { "type": "text" },
                "created": { "type": "date", "format": "MM-dd-yyyy:HH:mm:ss" },
                "modified": { "type": "date", "format": "MM-dd-yyyy:HH:mm:ss" },
                "create_date": { "type": "date", "format": "MM-dd-yyyy" },
                "age_qualification": { "type": "integer" },
                "rating": { "type": "float" },
                "file": { "type": "keyword", "index": false },
                "category": { "type": "keyword" },
                "genres": { "type": "keyword" },
                "actors": { "type": "keyword" },
                "writers": { "type": "keyword" },
                "directors": { "type": "keyword" }
            }
        }
    })
}
