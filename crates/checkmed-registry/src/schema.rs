pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS medicines (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  drug_name TEXT NOT NULL,
  form_factor TEXT NOT NULL,
  registration_number TEXT NOT NULL,
  manufacturer TEXT NOT NULL,
  package_image_ref TEXT NOT NULL,
  secondary_image_ref TEXT,
  created_at TEXT NOT NULL,
  UNIQUE (drug_name, form_factor)
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(drug_name);
"#;
