// Static relation registry. Declares, per entity table, the outgoing
// relations the cascade engine and the delete policy traverse. Built once
// at startup and never mutated afterwards; the declarations mirror the
// schema in migrations/001_initial.sql.

use std::collections::HashMap;
use std::sync::OnceLock;

use rusqlite::{params, Connection};

#[derive(Debug, Clone, Copy)]
pub enum Relation {
    /// Dependents hold a foreign key back to the owning row.
    Direct {
        name: &'static str,
        table: &'static str,
        column: &'static str,
    },
    /// Many-to-many through a join table. Resolves to the join rows and the
    /// far-side rows they point at.
    ManyToMany {
        name: &'static str,
        join_table: &'static str,
        join_column: &'static str,
        far_table: &'static str,
        far_column: &'static str,
    },
}

impl Relation {
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Direct { name, .. } => name,
            Relation::ManyToMany { name, .. } => name,
        }
    }
}

/// A dependent row reachable from an entity in one hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedRow {
    pub relation: &'static str,
    pub table: &'static str,
    pub id: String,
}

#[derive(Debug)]
pub struct RelationGraph {
    edges: HashMap<&'static str, Vec<Relation>>,
}

/// The process-wide graph, computed once.
pub fn graph() -> &'static RelationGraph {
    static GRAPH: OnceLock<RelationGraph> = OnceLock::new();
    GRAPH.get_or_init(RelationGraph::build)
}

impl RelationGraph {
    fn build() -> Self {
        let mut edges: HashMap<&'static str, Vec<Relation>> = HashMap::new();

        edges.insert(
            "users",
            vec![
                Relation::ManyToMany {
                    name: "sports",
                    join_table: "user_sport_certifications",
                    join_column: "user_id",
                    far_table: "sports",
                    far_column: "sport_id",
                },
                Relation::ManyToMany {
                    name: "certifications",
                    join_table: "user_sport_certifications",
                    join_column: "user_id",
                    far_table: "certifications",
                    far_column: "certification_id",
                },
                Relation::Direct {
                    name: "tags",
                    table: "tags",
                    column: "user_id",
                },
                Relation::Direct {
                    name: "posts",
                    table: "posts",
                    column: "user_id",
                },
                Relation::Direct {
                    name: "comments",
                    table: "comments",
                    column: "user_id",
                },
                Relation::Direct {
                    name: "likes",
                    table: "likes",
                    column: "user_id",
                },
            ],
        );
        edges.insert(
            "experiences",
            vec![Relation::Direct {
                name: "users",
                table: "users",
                column: "experience_id",
            }],
        );
        edges.insert(
            "sports",
            vec![
                Relation::ManyToMany {
                    name: "tags",
                    join_table: "tags_sports",
                    join_column: "sport_id",
                    far_table: "tags",
                    far_column: "tag_id",
                },
                Relation::ManyToMany {
                    name: "users",
                    join_table: "user_sport_certifications",
                    join_column: "sport_id",
                    far_table: "users",
                    far_column: "user_id",
                },
            ],
        );
        edges.insert(
            "certification_difficulties",
            vec![Relation::Direct {
                name: "certifications",
                table: "certifications",
                column: "difficulty_id",
            }],
        );
        edges.insert(
            "certifications",
            vec![Relation::ManyToMany {
                name: "users",
                join_table: "user_sport_certifications",
                join_column: "certification_id",
                far_table: "users",
                far_column: "user_id",
            }],
        );
        edges.insert("user_sport_certifications", vec![]);
        edges.insert(
            "tags",
            vec![
                Relation::ManyToMany {
                    name: "sports",
                    join_table: "tags_sports",
                    join_column: "tag_id",
                    far_table: "sports",
                    far_column: "sport_id",
                },
                Relation::ManyToMany {
                    name: "posts",
                    join_table: "posts_tags",
                    join_column: "tag_id",
                    far_table: "posts",
                    far_column: "post_id",
                },
            ],
        );
        edges.insert("tags_sports", vec![]);
        edges.insert(
            "posts",
            vec![
                Relation::ManyToMany {
                    name: "tags",
                    join_table: "posts_tags",
                    join_column: "post_id",
                    far_table: "tags",
                    far_column: "tag_id",
                },
                Relation::Direct {
                    name: "replies",
                    table: "posts",
                    column: "post_id",
                },
                Relation::Direct {
                    name: "comments",
                    table: "comments",
                    column: "post_id",
                },
                Relation::Direct {
                    name: "likes",
                    table: "likes",
                    column: "post_id",
                },
            ],
        );
        edges.insert("posts_tags", vec![]);
        edges.insert(
            "comments",
            vec![Relation::Direct {
                name: "replies",
                table: "comments",
                column: "comment_id",
            }],
        );
        edges.insert(
            "likes",
            vec![Relation::Direct {
                name: "likes",
                table: "likes",
                column: "like_id",
            }],
        );

        Self { edges }
    }

    pub fn outgoing(&self, table: &str) -> &[Relation] {
        self.edges.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True for every entity table the graph knows about, join tables included.
    pub fn is_known(&self, table: &str) -> bool {
        self.edges.contains_key(table)
    }

    pub fn tables(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.edges.keys().copied()
    }

    /// Resolves the dependents of one row: for direct relations the rows
    /// holding a foreign key back to it, for many-to-many relations the join
    /// rows plus the far-side rows they link.
    pub fn related_of(
        &self,
        conn: &Connection,
        table: &str,
        id: &str,
    ) -> rusqlite::Result<Vec<RelatedRow>> {
        let mut out = Vec::new();
        for rel in self.outgoing(table) {
            match *rel {
                Relation::Direct {
                    name,
                    table: child,
                    column,
                } => {
                    let mut stmt =
                        conn.prepare(&format!("SELECT id FROM {} WHERE {} = ?1", child, column))?;
                    let ids = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
                    for child_id in ids {
                        out.push(RelatedRow {
                            relation: name,
                            table: child,
                            id: child_id?,
                        });
                    }
                }
                Relation::ManyToMany {
                    name,
                    join_table,
                    join_column,
                    far_table,
                    far_column,
                } => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT id, {} FROM {} WHERE {} = ?1",
                        far_column, join_table, join_column
                    ))?;
                    let pairs = stmt.query_map(params![id], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?;
                    for pair in pairs {
                        let (join_id, far_id) = pair?;
                        out.push(RelatedRow {
                            relation: name,
                            table: join_table,
                            id: join_id,
                        });
                        out.push(RelatedRow {
                            relation: name,
                            table: far_table,
                            id: far_id,
                        });
                    }
                }
            }
        }
        Ok(out)
    }
}
