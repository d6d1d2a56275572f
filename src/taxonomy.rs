//! Keyword taxonomy used for classification.
//!
//! A simplified IPTC-like set of categories with trigger keywords in Spanish,
//! English and Portuguese. Each category carries:
//! - broad `keywords` (several hits are normally required),
//! - `strong` keywords (a single hit can be enough),
//! - `exclude` terms that never count for that category.
//!
//! The built-in table can be replaced by a YAML file:
//!
//! ```yaml
//! categories:
//!   - name: Politics
//!     keywords: [president, election, senate]
//!     strong: [runoff]
//!   - name: Technology
//!     keywords: [software, chip]
//!     exclude: [software]
//! ```
//!
//! Declaration order is significant: classification output and tie-breaking
//! follow it.

use crate::error::{NewsError, Result};
use crate::utils::normalize_text;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// Label used when an article matches no category.
pub const DEFAULT_CATEGORY: &str = "General";

/// A category as written by a user (YAML) or in the built-in table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CategoryDef {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub strong: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    categories: Vec<CategoryDef>,
}

/// A category ready for matching: keywords normalized, deduplicated and filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
    pub strong: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// Build a taxonomy from raw definitions.
    ///
    /// # Errors
    ///
    /// Fails when there are no categories, a name is blank or a name repeats.
    pub fn from_defs(defs: Vec<CategoryDef>) -> Result<Self> {
        if defs.is_empty() {
            return Err(NewsError::Taxonomy("taxonomy has no categories".into()));
        }

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(defs.len());
        for def in defs {
            let name = def.name.trim().to_string();
            if name.is_empty() {
                return Err(NewsError::Taxonomy("category with empty name".into()));
            }
            if !seen.insert(name.clone()) {
                return Err(NewsError::Taxonomy(format!("duplicate category: {name}")));
            }

            let exclude: HashSet<String> = def.exclude.iter().map(|t| normalize_text(t.trim())).collect();
            categories.push(Category {
                name,
                keywords: normalize_terms(&def.keywords)
                    .into_iter()
                    .filter(|k| !exclude.contains(k))
                    .collect(),
                strong: normalize_terms(&def.strong),
            });
        }
        Ok(Self { categories })
    }

    /// Parse a taxonomy from YAML text (see the module docs for the layout).
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: TaxonomyFile = serde_yaml::from_str(yaml)?;
        Self::from_defs(file.categories)
    }

    /// Load a taxonomy from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path).await?;
        let taxonomy = Self::from_yaml_str(&yaml)?;
        info!(categories = taxonomy.categories.len(), "Loaded taxonomy");
        Ok(taxonomy)
    }

    /// The built-in multilingual taxonomy.
    pub fn builtin() -> Self {
        let defs = BUILTIN
            .iter()
            .map(|b| CategoryDef {
                name: b.name.to_string(),
                keywords: b.keywords.iter().map(|s| s.to_string()).collect(),
                strong: b.strong.iter().map(|s| s.to_string()).collect(),
                exclude: b.exclude.iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        Self::from_defs(defs).expect("built-in taxonomy is valid")
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Declaration index of a category, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| normalize_text(t.trim()))
        .filter(|t| !t.is_empty())
        .unique()
        .collect()
}

struct BuiltinCategory {
    name: &'static str,
    keywords: &'static [&'static str],
    strong: &'static [&'static str],
    exclude: &'static [&'static str],
}

// Keyword lists are grouped ES / EN / PT.
const BUILTIN: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "Politics",
        keywords: &[
            "presidente", "gobierno", "ministro", "asamblea", "congreso", "parlamento",
            "elecciones", "votacion", "reforma", "decreto", "partido", "candidato", "campana",
            "encuesta", "senado",
            "president", "government", "minister", "congress", "parliament", "election",
            "policy", "reform", "decree", "party", "candidate", "campaign", "senate", "poll",
            "governo", "eleicao", "campanha",
        ],
        strong: &[
            "balotaje", "segunda vuelta", "encuesta electoral", "decreto ley", "boleta unica",
            "candidato presidencial", "gira presidencial",
            "runoff", "ballot", "election runoff", "presidential candidate", "executive order",
            "segundo turno", "urna", "medida provisoria",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Economy",
        keywords: &[
            "inflacion", "pib", "tasa de interes", "mercado", "deficit", "exportaciones",
            "importaciones", "dolar", "tipo de cambio", "desempleo", "impuestos", "tarifas",
            "deuda",
            "inflation", "gdp", "interest rate", "market", "exports", "imports", "dollar",
            "unemployment", "taxes", "tariffs", "debt", "trade balance",
            "economia", "inflacao", "juros", "desemprego", "impostos", "divida",
        ],
        strong: &[
            "inflacion", "recesion", "estanflacion", "devaluacion", "banco central",
            "tasas de interes", "riesgo pais", "salario minimo", "indice de precios",
            "suba de precios", "canasta basica",
            "inflation", "recession", "stagflation", "devaluation", "central bank",
            "interest rate", "cpi", "ppi", "minimum wage",
            "inflacao", "recessao", "desvalorizacao", "taxa de juros", "ipca",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Business",
        keywords: &[
            "empresa", "negocio", "ingresos", "utilidades", "ganancias", "adquisicion",
            "fusion", "acuerdo", "contrato", "inversion", "ventas", "facturacion", "proveedores",
            "company", "business", "earnings", "profits", "merger", "acquisition", "deal",
            "contract", "investment", "startup", "sales", "revenue", "supplier",
            "negocios", "lucros", "fusao", "aquisicao", "investimento", "vendas", "receita",
            "fornecedor",
        ],
        strong: &[
            "adquisicion", "fusion", "oferta publica", "opa", "salida a bolsa",
            "resultados trimestrales", "facturacion", "ingresos record",
            "ronda de financiacion", "capital de riesgo", "despidos masivos",
            "acquisition", "merger", "ipo", "earnings", "quarterly results", "revenue record",
            "venture capital", "layoffs",
            "fusao", "aquisicao", "resultados trimestrais", "receita recorde", "demissoes",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Technology",
        keywords: &[
            "tecnologia", "software", "ciberseguridad", "plataforma", "algoritmo", "nube",
            "datos", "chip", "semiconductores", "inteligencia artificial", "ia", "aplicacion",
            "redes sociales",
            "technology", "cybersecurity", "platform", "algorithm", "cloud", "data",
            "semiconductor", "artificial intelligence", "ai", "app", "social media",
            "dados", "seguranca cibernetica", "aplicativo", "rede social",
        ],
        strong: &[
            "inteligencia artificial", "ia", "machine learning", "ciberataque",
            "filtracion de datos", "chip", "semiconductor", "app", "redes sociales",
            "artificial intelligence", "ai", "cyberattack", "data breach", "social media",
            "aprendizado de maquina", "ataque cibernetico", "vazamento de dados",
            "semicondutor", "aplicativo",
        ],
        exclude: &["tecnologia", "technology", "datos", "data", "plataforma", "platform", "software"],
    },
    BuiltinCategory {
        name: "Health",
        keywords: &[
            "salud", "hospital", "vacuna", "virus", "pandemia", "brote", "salud publica",
            "epidemia", "dengue", "covid", "gripe",
            "health", "vaccine", "pandemic", "outbreak", "public health", "epidemic", "flu",
            "saude", "vacina", "surto",
        ],
        strong: &[
            "brote", "dengue", "covid", "gripe", "vacunacion", "alerta sanitaria",
            "outbreak", "flu", "vaccination", "health alert",
            "surto", "vacinacao", "alerta sanitario",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Sports",
        keywords: &[
            "deporte", "futbol", "baloncesto", "tenis", "copa", "liga", "equipo", "campeonato",
            "mundial", "goles", "partido", "marcador", "victoria", "derrota",
            "sports", "football", "soccer", "basketball", "tennis", "cup", "league", "team",
            "championship", "world cup", "match", "score", "win", "loss",
            "futebol", "time", "gol", "partida", "placar", "vitoria",
        ],
        strong: &[
            "partido", "victoria", "derrota", "marcador", "final", "semifinal", "copa america",
            "mundial", "libertadores",
            "match", "win", "loss", "score", "world cup",
            "partida", "vitoria", "placar",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Environment",
        keywords: &[
            "medioambiente", "clima", "cambio climatico", "emisiones", "co2", "deforestacion",
            "contaminacion", "biodiversidad", "huracan", "sequía", "inundacion", "incendio",
            "environment", "climate", "climate change", "emissions", "deforestation",
            "pollution", "biodiversity", "hurricane", "drought", "flood", "wildfire",
            "meio ambiente", "emissoes", "desmatamento", "poluicao", "biodiversidade", "seca",
            "enchente",
        ],
        strong: &[
            "ola de calor", "incendio forestal", "sequía", "inundacion", "contaminacion",
            "emisiones", "deforestacion",
            "heat wave", "wildfire", "drought", "flood", "pollution", "emissions",
            "deforestation",
            "onda de calor", "incendio florestal", "seca", "enchente", "poluicao", "emissoes",
            "desmatamento",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Culture/Entertainment",
        keywords: &[
            "cultura", "cine", "pelicula", "musica", "arte", "teatro", "festival", "celebridad",
            "entretenimiento", "serie", "estreno", "taquilla", "concierto", "gira",
            "culture", "cinema", "movie", "music", "art", "theater", "celebrity",
            "entertainment", "series", "premiere", "box office", "concert", "tour",
            "filme", "estreia", "bilheteria", "show", "turne",
        ],
        strong: &[
            "estreno", "taquilla", "concierto", "festival", "gira",
            "premiere", "box office", "concert", "tour",
            "estreia", "bilheteria", "show", "turne",
        ],
        exclude: &[],
    },
    BuiltinCategory {
        name: "Crime/Law",
        keywords: &[
            "crimen", "delito", "arresto", "homicidio", "narcotrafico", "tribunal", "juzgado",
            "sentencia", "juicio", "corrupcion", "fiscalia", "policia", "allanamiento",
            "crime", "arrest", "homicide", "court", "trial", "sentence", "corruption",
            "prosecutor", "police", "raid",
            "prisao", "corrupcao", "busca e apreensao",
        ],
        strong: &[
            "detencion", "allanamiento", "condena", "juicio oral", "investigacion fiscal",
            "lavado de dinero",
            "arrest", "raid", "conviction", "indictment", "money laundering",
            "prisao", "busca e apreensao", "condenacao", "acusacao", "lavagem de dinheiro",
        ],
        exclude: &[],
    },
];
