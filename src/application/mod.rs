// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user action:
//
//   product_use_case.rs — fetch a product page, extract the
//                         record, build the card summary
//
//   ask_use_case.rs     — normalise a question, ask the QA model
//                         about both context blocks, merge
//
// Rules for this layer:
//   - No model code or markup parsing here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

/// Settings handed down from the CLI
pub mod config;

/// Product fetch and summary workflow
pub mod product_use_case;

/// The question-answering workflow
pub mod ask_use_case;
