//! The staff page listing registered truckers.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    auth::CurrentUser,
    dashboard::page::{DashboardState, dashboard_layout},
    endpoints,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
};

/// Display the ID and trucker name of every profile.
pub async fn get_users_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let profiles = state.load_profiles()?;

    let content = html! {
        @if profiles.is_empty() {
            p class="text-gray-500 dark:text-gray-400" { "No truckers have signed up yet." }
        } @else {
            div class="w-full overflow-x-auto rounded shadow"
            {
                table id="users-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Trucker Name" }
                        }
                    }

                    tbody
                    {
                        @for profile in &profiles {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (profile.id) }
                                td class=(TABLE_CELL_STYLE) { (profile.trucker_name) }
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(dashboard_layout("Users", endpoints::USERS_VIEW, &user, &[], &content).into_response())
}
