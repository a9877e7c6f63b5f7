//! Landing page.

use crate::controllers::{unknown_action, ActionContext, Controller, Reply};
use crate::error::AppError;
use crate::view::context;

#[derive(Debug, Default)]
pub struct Home;

impl Controller for Home {
    fn name(&self) -> &'static str {
        "Home"
    }

    fn has_action(&self, action: &str) -> bool {
        action == "index"
    }

    fn perform(&mut self, action: &str, ctx: &mut ActionContext<'_>) -> Result<Reply, AppError> {
        match action {
            "index" => Ok(Reply::Html(
                ctx.services.views.render("Home/index.html", context! {})?,
            )),
            other => Err(unknown_action(self.name(), other)),
        }
    }
}
