use newsdesk::application::posts::{DeleteOutcome, FixedAnswer};
use newsdesk::config::{PostFieldArgs, PostsCmd};
use newsdesk::domain::posts::{normalize_form, parse_tags};
use newsdesk::infra::terminal::Terminal;
use newsdesk::presentation::views::posts::PostsPanelTemplate;
use newsdesk_api_types::{PostForm, PostStatus};

use crate::client::{CliError, Ctx};
use crate::io::{parse_time_opt, read_opt_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { json } => list(ctx, json).await,
        PostsCmd::Get { id } => get(ctx, &id).await,
        PostsCmd::Create(fields) => create(ctx, fields).await,
        PostsCmd::Update { id, fields } => update(ctx, &id, fields).await,
        PostsCmd::Delete { id, yes } => delete(ctx, &id, yes).await,
    }
}

async fn list(ctx: &Ctx, json: bool) -> Result<(), CliError> {
    let mut store = ctx.store();
    store.list().await;
    if store.error().is_some() {
        return Err(CliError::failed("posts could not be loaded"));
    }

    if json {
        print_json(store.posts())
    } else {
        let panel = PostsPanelTemplate::from_store(&store).render_text()?;
        print!("{panel}");
        Ok(())
    }
}

async fn get(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let post = ctx
        .store()
        .fetch_one(id)
        .await
        .ok_or_else(|| CliError::failed(format!("post `{id}` could not be loaded")))?;
    print_json(&post)
}

async fn create(ctx: &Ctx, fields: PostFieldArgs) -> Result<(), CliError> {
    if fields.title.is_none() {
        return Err(CliError::InvalidInput("--title is required".into()));
    }
    let mut form = PostForm::default();
    apply_fields(&mut form, fields)?;
    let form = normalize_form(form)?;

    let post = ctx
        .store()
        .create(&form)
        .await
        .ok_or_else(|| CliError::failed("post could not be created"))?;
    print_json(&post)
}

async fn update(ctx: &Ctx, id: &str, fields: PostFieldArgs) -> Result<(), CliError> {
    let mut store = ctx.store();
    let current = store
        .fetch_one(id)
        .await
        .ok_or_else(|| CliError::failed(format!("post `{id}` could not be loaded")))?;

    let mut form = PostForm::from(&current);
    apply_fields(&mut form, fields)?;
    let form = normalize_form(form)?;

    let post = store
        .update(id, &form)
        .await
        .ok_or_else(|| CliError::failed(format!("post `{id}` could not be updated")))?;
    print_json(&post)
}

async fn delete(ctx: &Ctx, id: &str, yes: bool) -> Result<(), CliError> {
    // No table is shown afterwards, so skip the refresh.
    let mut store = ctx.store();
    let outcome = if yes {
        store.remove(id, &FixedAnswer(true)).await
    } else {
        store.remove(id, &Terminal::stdin()).await
    };

    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Cancelled => {
            println!("cancelled");
            Ok(())
        }
        DeleteOutcome::Failed => Err(CliError::failed(format!(
            "post `{id}` could not be deleted"
        ))),
    }
}

/// Overlay the flags that were given onto `form`; absent flags keep the current value.
pub(crate) fn apply_fields(form: &mut PostForm, fields: PostFieldArgs) -> Result<(), CliError> {
    let PostFieldArgs {
        title,
        status,
        slug,
        category,
        excerpt,
        content,
        content_file,
        tags,
        featured_image,
        author,
        meta_title,
        meta_description,
        news,
        published_at,
    } = fields;

    if let Some(title) = title {
        form.title = title;
    }
    if let Some(status) = status {
        form.status = PostStatus::from(status.trim());
    }
    overlay(&mut form.slug, slug);
    overlay(&mut form.category, category);
    overlay(&mut form.excerpt, excerpt);
    overlay(&mut form.content, read_opt_value(content, content_file)?);
    if let Some(tags) = tags {
        form.tags = parse_tags(&tags);
    }
    overlay(&mut form.featured_image, featured_image);
    overlay(&mut form.author, author);
    overlay(&mut form.meta_title, meta_title);
    overlay(&mut form.meta_description, meta_description);
    if let Some(news) = news {
        form.is_news = Some(news);
    }
    if let Some(at) = parse_time_opt(published_at)? {
        form.published_at = Some(at);
    }
    Ok(())
}

fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = Some(value);
    }
}
