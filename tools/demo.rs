//! Replays the canonical book-catalog statement set against an in-memory
//! store: basic CRUD, advanced queries, aggregation pipelines, and
//! indexing with explain.

use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use shelfdb::dto::{
    AggregateRequest, CreateIndexRequest, DeleteRequest, ExplainRequest, FindRequest,
    InsertRequest, UpdateRequest,
};
use shelfdb::infrastructure::memory::MemoryDocumentStore;
use shelfdb::use_cases::{
    AggregateDocumentsUseCase, CreateIndexUseCase, DeleteDocumentUseCase, ExplainQueryUseCase,
    FindDocumentsUseCase, InsertDocumentsUseCase, UpdateDocumentUseCase,
};
use shelfdb::Config;

#[derive(Parser)]
struct Cli {
    /// Print results as compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

struct Demo {
    cli: Cli,
    insert: InsertDocumentsUseCase,
    find: FindDocumentsUseCase,
    update: UpdateDocumentUseCase,
    delete: DeleteDocumentUseCase,
    aggregate: AggregateDocumentsUseCase,
    create_index: CreateIndexUseCase,
    explain: ExplainQueryUseCase,
}

impl Demo {
    fn print(&self, heading: &str, value: &impl serde::Serialize) -> anyhow::Result<()> {
        let rendered = if self.cli.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        println!("\n// {}\n{}", heading, rendered);
        Ok(())
    }

    async fn run_find(&self, heading: &str, request: FindRequest) -> anyhow::Result<()> {
        let response = self.find.execute(request).await?;
        self.print(heading, &response.documents)
    }

    async fn run_aggregate(
        &self,
        heading: &str,
        collection: &str,
        pipeline: Value,
    ) -> anyhow::Result<()> {
        let response = self
            .aggregate
            .execute(AggregateRequest {
                collection: collection.to_string(),
                pipeline,
            })
            .await?;
        self.print(heading, &response.documents)
    }
}

fn catalog() -> Vec<Value> {
    vec![
        json!({"title": "1984", "author": "George Orwell", "genre": "Fiction",
               "published_year": 1949, "price": 9.99, "in_stock": true}),
        json!({"title": "Animal Farm", "author": "George Orwell", "genre": "Fiction",
               "published_year": 1945, "price": 7.5, "in_stock": true}),
        json!({"title": "The Alchemist", "author": "Paulo Coelho", "genre": "Fiction",
               "published_year": 1988, "price": 12.5, "in_stock": true}),
        json!({"title": "Moby Dick", "author": "Herman Melville", "genre": "Adventure",
               "published_year": 1851, "price": 11.0, "in_stock": false}),
        json!({"title": "Dune", "author": "Frank Herbert", "genre": "Science Fiction",
               "published_year": 1965, "price": 12.0, "in_stock": true}),
        json!({"title": "The Martian", "author": "Andy Weir", "genre": "Science Fiction",
               "published_year": 2011, "price": 14.0, "in_stock": true}),
        json!({"title": "Project Hail Mary", "author": "Andy Weir", "genre": "Science Fiction",
               "published_year": 2021, "price": 18.99, "in_stock": true}),
        json!({"title": "Klara and the Sun", "author": "Kazuo Ishiguro", "genre": "Fiction",
               "published_year": 2021, "price": 16.5, "in_stock": false}),
        json!({"title": "Emma", "author": "Jane Austen", "genre": "Romance",
               "published_year": 1815, "price": 8.25, "in_stock": true}),
        json!({"title": "Persuasion", "author": "Jane Austen", "genre": "Romance",
               "published_year": 1817, "price": 8.75, "in_stock": true}),
        json!({"title": "Pride and Prejudice", "author": "Jane Austen", "genre": "Romance",
               "published_year": 1813, "price": 9.5, "in_stock": true}),
        json!({"title": "Brave New World", "author": "Aldous Huxley", "genre": "Fiction",
               "published_year": 1932, "price": 10.25, "in_stock": true}),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let store = Arc::new(MemoryDocumentStore::with_config(config.clone()));
    let demo = Demo {
        cli,
        insert: InsertDocumentsUseCase::new(store.clone()),
        find: FindDocumentsUseCase::new(store.clone(), config.clone()),
        update: UpdateDocumentUseCase::new(store.clone()),
        delete: DeleteDocumentUseCase::new(store.clone()),
        aggregate: AggregateDocumentsUseCase::new(store.clone(), config.clone()),
        create_index: CreateIndexUseCase::new(store.clone()),
        explain: ExplainQueryUseCase::new(store),
    };

    let inserted = demo
        .insert
        .execute(InsertRequest {
            collection: "books".to_string(),
            documents: catalog(),
        })
        .await?;
    tracing::info!(count = inserted.inserted_count, "Seeded book catalog");

    // BASIC CRUD OPERATIONS

    demo.run_find(
        "Find all books in a specific genre",
        FindRequest {
            collection: "books".to_string(),
            filter: Some(json!({"genre": "Fiction"})),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Finding books published after a certain year",
        FindRequest {
            collection: "books".to_string(),
            filter: Some(json!({"published_year": {"$gt": 2000}})),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Finding books by a specific author",
        FindRequest {
            collection: "books".to_string(),
            filter: Some(json!({"author": "George Orwell"})),
            ..FindRequest::default()
        },
    )
    .await?;

    let updated = demo
        .update
        .execute(UpdateRequest {
            collection: "books".to_string(),
            filter: json!({"title": "The Alchemist"}),
            update: json!({"$set": {"price": 15.99}}),
        })
        .await?;
    demo.print("Updating the price of a specific book", &updated)?;

    let deleted = demo
        .delete
        .execute(DeleteRequest {
            collection: "books".to_string(),
            filter: json!({"title": "Moby Dick"}),
        })
        .await?;
    demo.print("Deleting a book by its title", &deleted)?;

    // ADVANCED QUERIES

    demo.run_find(
        "Books both in stock and published after 2010",
        FindRequest {
            collection: "books".to_string(),
            filter: Some(json!({"in_stock": true, "published_year": {"$gt": 2010}})),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Projection: only title, author, and price",
        FindRequest {
            collection: "books".to_string(),
            filter: Some(json!({})),
            projection: Some(json!({"_id": 0, "title": 1, "author": 1, "price": 1})),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Sorting books by price ascending",
        FindRequest {
            collection: "books".to_string(),
            sort: Some(json!({"price": 1})),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Sorting books by price descending",
        FindRequest {
            collection: "books".to_string(),
            sort: Some(json!({"price": -1})),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Pagination: page 1 (5 per page)",
        FindRequest {
            collection: "books".to_string(),
            limit: Some(5),
            skip: Some(0),
            ..FindRequest::default()
        },
    )
    .await?;

    demo.run_find(
        "Pagination: page 2 (5 per page)",
        FindRequest {
            collection: "books".to_string(),
            limit: Some(5),
            skip: Some(5),
            ..FindRequest::default()
        },
    )
    .await?;

    // AGGREGATION PIPELINES

    demo.run_aggregate(
        "Average price of books by genre",
        "books",
        json!([{
            "$group": {
                "_id": "$genre",
                "average_price": {"$avg": "$price"},
                "total_books": {"$sum": 1}
            }
        }]),
    )
    .await?;

    demo.run_aggregate(
        "Author with the most books",
        "books",
        json!([
            {"$group": {"_id": "$author", "total_books": {"$sum": 1}}},
            {"$sort": {"total_books": -1}},
            {"$limit": 1}
        ]),
    )
    .await?;

    demo.run_aggregate(
        "Grouping books by publication decade",
        "books",
        json!([
            {
                "$group": {
                    "_id": {
                        "decade": {
                            "$multiply": [
                                {"$floor": {"$divide": ["$published_year", 10]}},
                                10
                            ]
                        }
                    },
                    "total_books": {"$sum": 1}
                }
            },
            {"$sort": {"_id.decade": 1}}
        ]),
    )
    .await?;

    // INDEXING

    let title_index = demo
        .create_index
        .execute(CreateIndexRequest {
            collection: "books".to_string(),
            keys: json!({"title": 1}),
            unique: false,
        })
        .await?;
    demo.print("Creating index on title", &title_index)?;

    let compound_index = demo
        .create_index
        .execute(CreateIndexRequest {
            collection: "books".to_string(),
            keys: json!({"author": 1, "published_year": -1}),
            unique: false,
        })
        .await?;
    demo.print(
        "Creating compound index on author and published_year",
        &compound_index,
    )?;

    let report = demo
        .explain
        .execute(ExplainRequest {
            collection: "books".to_string(),
            filter: Some(json!({"title": "1984"})),
            mode: Some("executionStats".to_string()),
        })
        .await?;
    demo.print("Using explain() to inspect the title lookup", &report)?;

    Ok(())
}
