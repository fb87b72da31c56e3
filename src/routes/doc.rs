use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        menu::MenuList,
        messages::ContactRequest,
        orders::{
            AdminOrder, AdminOrderList, OrderDetail, OrderItemView, OrderLineRequest, OrderStats,
            PlaceOrderRequest, PlaceOrderResponse, UpdateOrderStatusRequest,
        },
    },
    models::{ContactMessage, MenuItem, Order, OrderItem, OrderStatus, PaymentMethod},
    response::{ApiResponse, Meta},
    routes::{admin, auth, contact, health, menu, orders, params},
    services::dashboard_service::{Dashboard, DashboardStats},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        menu::list_menu,
        menu::get_menu_item,
        orders::place_order,
        orders::get_order,
        contact::create_message,
        admin::dashboard,
        admin::list_menu,
        admin::create_menu_item,
        admin::update_menu_item,
        admin::delete_menu_item,
        admin::list_orders,
        admin::update_order_status,
        admin::export_orders,
        admin::list_messages,
    ),
    components(
        schemas(
            MenuItem,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            ContactMessage,
            MenuList,
            LoginRequest,
            LoginResponse,
            ContactRequest,
            PlaceOrderRequest,
            OrderLineRequest,
            PlaceOrderResponse,
            OrderDetail,
            OrderItemView,
            AdminOrder,
            AdminOrderList,
            OrderStats,
            UpdateOrderStatusRequest,
            Dashboard,
            DashboardStats,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<MenuItem>,
            ApiResponse<MenuList>,
            ApiResponse<Order>,
            ApiResponse<OrderDetail>,
            ApiResponse<AdminOrderList>,
            ApiResponse<PlaceOrderResponse>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Menu", description = "Public catalog"),
        (name = "Orders", description = "Checkout and order lookup"),
        (name = "Contact", description = "Contact form"),
        (name = "Auth", description = "Back-office authentication"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
