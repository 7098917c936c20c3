mod analysis;
mod knowledge;
mod memory;
mod notify;
mod order;
mod product;

pub use analysis::{AnalyzeSentimentTool, TranslateToEnglishTool};
pub use knowledge::{MAX_KB_SNIPPETS, RetrieveKbSnippetsTool};
pub use memory::{AddMemoryTool, RetrieveMemoryTool};
pub use notify::{NotifyEmailSupportTool, NotifyTelegramSupportTool};
pub use order::{ExtractOrderIdTool, GetOrderStatusTool, extract_order_id};
pub use product::SearchProductsTool;
