//! API constants
//!
//! Centralized location for endpoint URLs, OAuth scopes and environment
//! variable names used throughout the client.

// Endpoints
pub const DEFAULT_API_URL: &str = "https://api.emploi-store.fr/partenaire";
pub const DEFAULT_TOKEN_URL: &str =
    "https://entreprise.pole-emploi.fr/connexion/oauth2/access_token";
pub const DEFAULT_REALM: &str = "/partenaire";

// Token lifecycle
pub const DEFAULT_TOKEN_VALIDITY_MARGIN_SECS: u64 = 5;
pub const DEFAULT_TOKEN_EXPIRES_IN_SECS: i64 = 600;

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Datastore
pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const CATALOG_ORGANIZATION: &str = "digidata";

// Scopes, one per partner API
pub const SCOPE_INFOTRAVAIL: &str = "api_infotravailv1";
pub const SCOPE_LA_BONNE_BOITE: &str = "api_labonneboitev1";
pub const SCOPE_RETOUR_EMPLOI_FORMATION: &str = "api_retouralemploisuiteformationv1";
pub const SCOPE_SOFT_SKILLS: &str = "api_matchviasoftskillsv1";
pub const SCOPE_SERVICES_CATALOGUE: &str =
    "api_cataloguedesservicesemploistorev1 emploistoreusagers";
pub const SCOPE_EVENTS: &str = "api_evenementsv1 evenements";

// Environment variables
pub const ENV_CLIENT_ID: &str = "EMPLOI_STORE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "EMPLOI_STORE_CLIENT_SECRET";
pub const ENV_API_URL: &str = "EMPLOI_STORE_API_URL";
pub const ENV_TOKEN_URL: &str = "EMPLOI_STORE_TOKEN_URL";
pub const ENV_TIMEOUT_SECS: &str = "EMPLOI_STORE_TIMEOUT_SECS";
pub const ENV_BATCH_SIZE: &str = "EMPLOI_STORE_BATCH_SIZE";

// Records
pub const BYTE_ORDER_MARK: char = '\u{feff}';
pub const RESERVED_ID_FIELD: &str = "_id";
