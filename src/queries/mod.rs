pub mod relationship_queries;
