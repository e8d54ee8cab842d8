/// SQL schema for the Trailbook database.
///
/// There are deliberately no foreign keys and no cascades: referential
/// checks run at the application layer before every write. The store only
/// enforces id and username/email uniqueness, which is the last line of
/// defense behind the racy scan-max id allocator.
pub const SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL
);

-- Trips table
CREATE TABLE IF NOT EXISTS trips (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    creation_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_trips_user_id ON trips(user_id);

-- Stages table
CREATE TABLE IF NOT EXISTS stages (
    id INTEGER PRIMARY KEY,
    trip_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    creation_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stages_trip_id ON stages(trip_id);

-- Posts table
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY,
    stage_id INTEGER NOT NULL,
    trip_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    story TEXT NOT NULL,
    creation_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_stage_id ON posts(stage_id);
CREATE INDEX IF NOT EXISTS idx_posts_trip_id ON posts(trip_id);

-- Attractions table
CREATE TABLE IF NOT EXISTS attractions (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    popularity TEXT NOT NULL DEFAULT 'LOW',
    score INTEGER NOT NULL DEFAULT 0
);

-- Attraction/stage relation. No primary key: duplicate pairs are allowed
-- (multiset semantics).
CREATE TABLE IF NOT EXISTS attraction_stages (
    attraction_id INTEGER NOT NULL,
    stage_id INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_attraction_stages_stage_id ON attraction_stages(stage_id);
"#;

/// Development seed data. Passwords are sha256 digests of
/// "wanderer2024", "kodiak99" and "traveler!" respectively.
pub const TEST_DATA: &str = r#"
INSERT OR IGNORE INTO users (id, username, password, email) VALUES
    (1, 'ana', '055b77f97751083002ca5b7cd6702f14f5763f1d1581f56328f3ab4bd6e44728', 'ana@example.com'),
    (2, 'marco', '897e1cc00d7fe83599179f55c37a361bf975ae7aaa2820f3a98565251d1c459c', 'marco@example.com'),
    (3, 'ines', 'ebd86d5cf8982f3208fa5cf2dab89664f868b7f479423ba38ed9adcff653b076', 'ines@example.com');

INSERT OR IGNORE INTO trips (id, user_id, title, description, creation_date) VALUES
    (1, 1, 'Dolomites loop', 'Two weeks of hut-to-hut hiking', '2024-06-01T09:00:00+00:00'),
    (2, 2, 'Lisbon and the coast', 'City days, surf evenings', '2024-07-12T15:30:00+00:00');

INSERT OR IGNORE INTO stages (id, trip_id, user_id, title, description, creation_date) VALUES
    (1, 1, 1, 'Val Gardena', 'Base for the first three huts', '2024-06-02T08:00:00+00:00'),
    (2, 1, 1, 'Tre Cime', 'The classic circuit', '2024-06-06T07:45:00+00:00'),
    (3, 2, 2, 'Alfama', 'Old town wandering', '2024-07-13T10:00:00+00:00');

INSERT OR IGNORE INTO posts (id, stage_id, trip_id, user_id, story, creation_date) VALUES
    (1, 1, 1, 1, 'First pass crossed before the fog rolled in.', '2024-06-02T19:00:00+00:00'),
    (2, 3, 2, 2, 'Got lost twice, found the best pastel de nata once.', '2024-07-13T21:15:00+00:00');

INSERT OR IGNORE INTO attractions (id, name, description, popularity, score) VALUES
    (1, 'Rifugio Lavaredo', 'Hut below the three peaks', 'LOW', 0),
    (2, 'Miradouro de Santa Luzia', 'Tiled viewpoint over the river', 'HIGH', 14);

INSERT OR IGNORE INTO attraction_stages (attraction_id, stage_id) VALUES
    (1, 2),
    (2, 3);
"#;
