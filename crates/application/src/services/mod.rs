mod handler_chain;
mod zone_router;

pub use handler_chain::HandlerChain;
pub use zone_router::ZoneRouter;
