//! Static HTML pages served by the auth route.

/// Served to Discord's link crawler instead of the OAuth redirect, so embeds show something useful.
pub fn discord_crawler_authentication() -> String {
    r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta property="og:site_name" content="Loritta" />
    <meta property="og:title" content="Dashboard" />
    <meta property="og:description" content="Configure Loritta in your server through the dashboard!" />
    <meta name="theme-color" content="#00c1df" />
    <title>Loritta Dashboard</title>
  </head>
  <body></body>
</html>"##
        .to_string()
}

/// Shown when the bot still cannot see an invited guild after every poll.
pub fn guild_not_found(dashboard_url: &str) -> String {
    format!(
        r#"<p>It looks like you tried to add me to your server, but I'm still not in it!</p>
<ul>
<li>Try adding me again, sometimes this happens because of a delay until Discord updates the servers I am in. <a href="{dashboard_url}">{dashboard_url}</a></li>
<li>
Check your server's audit log, some bots kick/ban new bots when they are added. If that happened, kick the bot that punished me and add me again!
<ul>
<li>
<b>Instead of trusting a bot to "protect" your server:</b> Check who has the administrator or manage server permission in your server, they are the only ones who can add bots to it. There are rumours about "bugs that let people add bots without permission", but that is a lie.
</li>
</ul>
</li>
</ul>
<p>Sorry for the inconvenience ;w;</p>"#
    )
}
